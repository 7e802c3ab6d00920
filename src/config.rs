use crate::cli::Cli;
use crate::error::ConfigError;
use crate::format::ImageKind;
use crate::naming::expand_suffix;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_SUFFIX: &str = "_auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How to resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Fit inside the target box, preserving aspect ratio.
    Contain,
    /// Stretch to the target box.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpscalePolicy {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataPolicy {
    Strip,
    Preserve,
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub size: Dimensions,
    pub mode: ResizeMode,
    pub upscale: UpscalePolicy,
    pub format: Option<ImageKind>,
    /// Suffix with placeholders already expanded.
    pub suffix: String,
    pub include: BTreeSet<ImageKind>,
    pub recursive: bool,
    pub overwrite: bool,
    pub quality: u8,
    pub metadata: MetadataPolicy,
    pub png_optimize: bool,
    pub json_report: bool,
}

impl Config {
    /// Defaults used when no flag overrides them. The source is not checked.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let size = Dimensions::new(1280, 1280);
        Self {
            source: source.into(),
            output_dir: PathBuf::from("resized"),
            size,
            mode: ResizeMode::Contain,
            upscale: UpscalePolicy::Deny,
            format: None,
            suffix: expand_suffix(DEFAULT_SUFFIX, size),
            include: ImageKind::ALL.into_iter().collect(),
            recursive: true,
            overwrite: false,
            quality: DEFAULT_QUALITY,
            metadata: MetadataPolicy::Strip,
            png_optimize: true,
            json_report: false,
        }
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mode = if either(cli.exact, cli.keep_aspect, ("--exact", "--keep-aspect"), false)? {
            ResizeMode::Exact
        } else {
            ResizeMode::Contain
        };
        let upscale = if either(cli.upscale, cli.no_upscale, ("--upscale", "--no-upscale"), false)? {
            UpscalePolicy::Allow
        } else {
            UpscalePolicy::Deny
        };
        let recursive = either(
            cli.recursive,
            cli.no_recursive,
            ("--recursive", "--no-recursive"),
            true,
        )?;
        let metadata = if either(
            cli.strip_metadata,
            cli.preserve_metadata,
            ("--strip-metadata", "--preserve-metadata"),
            true,
        )? {
            MetadataPolicy::Strip
        } else {
            MetadataPolicy::Preserve
        };
        let png_optimize = either(
            cli.png_optimize,
            cli.no_png_optimize,
            ("--png-optimize", "--no-png-optimize"),
            true,
        )?;

        let quality = match u8::try_from(cli.quality) {
            Ok(q) if (1..=100).contains(&q) => q,
            _ => return Err(ConfigError::InvalidQuality(cli.quality)),
        };

        if !cli.source.exists() {
            return Err(ConfigError::SourceNotFound(cli.source));
        }
        if !cli.source.is_dir() {
            return Err(ConfigError::SourceNotDirectory(cli.source));
        }

        let include = if cli.include.is_empty() {
            ImageKind::ALL.into_iter().collect()
        } else {
            cli.include.into_iter().collect()
        };

        Ok(Self {
            source: cli.source,
            output_dir: cli.output,
            size: cli.size,
            mode,
            upscale,
            format: cli.ext,
            suffix: expand_suffix(&cli.suffix, cli.size),
            include,
            recursive,
            overwrite: cli.overwrite,
            quality,
            metadata,
            png_optimize,
            json_report: cli.json,
        })
    }
}

/// Resolves an on/off flag pair; `default` applies when neither is given.
fn either(
    on: bool,
    off: bool,
    names: (&'static str, &'static str),
    default: bool,
) -> Result<bool, ConfigError> {
    match (on, off) {
        (true, true) => Err(ConfigError::ConflictingFlags(names.0, names.1)),
        (true, false) => Ok(true),
        (false, true) => Ok(false),
        (false, false) => Ok(default),
    }
}

/// Parses `WIDTHxHEIGHT` (or `WIDTH,HEIGHT`) into positive dimensions.
pub fn parse_size(value: &str) -> Result<Dimensions, ConfigError> {
    let invalid = || ConfigError::InvalidSize(value.to_string());

    let normalized = value.trim().to_ascii_lowercase();
    let (width, height) = normalized
        .split_once(['x', ','])
        .ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok(Dimensions::new(width, height))
}
