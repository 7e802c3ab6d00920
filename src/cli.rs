use crate::config::{Dimensions, parse_size};
use crate::format::ImageKind;
use clap::Parser;
use std::path::PathBuf;

/// Command-line surface of `image-resizer`.
///
/// Paired switches (`--exact`/`--keep-aspect`, `--upscale`/`--no-upscale`,
/// ...) are plain flags here; [`Config::from_cli`](crate::Config::from_cli)
/// rejects contradictory pairs and applies the defaults.
#[derive(Parser, Debug)]
#[command(
    name = "image-resizer",
    version,
    about = "Batch resize, convert and optimize images (mozjpeg, oxipng, libwebp)"
)]
pub struct Cli {
    /// Source folder containing images
    pub source: PathBuf,

    /// Output folder
    #[arg(long, default_value = "resized")]
    pub output: PathBuf,

    /// Target size (WIDTHxHEIGHT)
    #[arg(long, value_parser = parse_size, default_value = "1280x1280")]
    pub size: Dimensions,

    /// Resize to the exact size, ignoring aspect ratio
    #[arg(long)]
    pub exact: bool,

    /// Keep aspect ratio, fitting inside the size (default)
    #[arg(long)]
    pub keep_aspect: bool,

    /// Allow enlarging images smaller than the target
    #[arg(long)]
    pub upscale: bool,

    /// Never enlarge images (default)
    #[arg(long)]
    pub no_upscale: bool,

    /// Force output format (jpg, png, webp, bmp, tiff, gif)
    #[arg(long, value_name = "FORMAT", value_parser = parse_kind)]
    pub ext: Option<ImageKind>,

    /// Filename suffix; `_auto` becomes `_<WIDTH>x<HEIGHT>`, `{width}`/`{height}` are expanded
    #[arg(long, default_value = "_auto")]
    pub suffix: String,

    /// Extensions to include (default: every supported format)
    #[arg(long, value_name = "EXT", num_args = 1.., value_parser = parse_kind)]
    pub include: Vec<ImageKind>,

    /// Recurse into subfolders (default)
    #[arg(long)]
    pub recursive: bool,

    /// Only process the top level of the source folder
    #[arg(long)]
    pub no_recursive: bool,

    /// Overwrite existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Quality for lossy formats (JPEG, WebP), 1-100
    #[arg(long, default_value_t = 85)]
    pub quality: u32,

    /// Strip EXIF/ICC metadata (default)
    #[arg(long)]
    pub strip_metadata: bool,

    /// Keep EXIF/ICC metadata where the output format can carry it
    #[arg(long)]
    pub preserve_metadata: bool,

    /// Run PNG output through oxipng (default)
    #[arg(long)]
    pub png_optimize: bool,

    /// Write PNG output as encoded, without oxipng
    #[arg(long)]
    pub no_png_optimize: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log every processed file
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_kind(value: &str) -> Result<ImageKind, crate::ConfigError> {
    ImageKind::from_extension(value)
}
