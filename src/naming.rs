//! Destination paths for resized images.
//!
//! A source `<root>/trips/beach.PNG` with suffix `_800x600` and no format
//! override lands at `<output>/trips/beach_800x600.png`.

use crate::config::{Config, DEFAULT_SUFFIX, Dimensions};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Expand a suffix template. `_auto` is shorthand for `_{width}x{height}`.
pub fn expand_suffix(template: &str, size: Dimensions) -> String {
    let template = if template == DEFAULT_SUFFIX {
        "_{width}x{height}"
    } else {
        template
    };
    template
        .replace("{width}", &size.width.to_string())
        .replace("{height}", &size.height.to_string())
}

/// Map `source` under `source_root` to its place under `output_dir`.
pub fn output_path(
    source: &Path,
    source_root: &Path,
    output_dir: &Path,
    suffix: &str,
    extension: Option<&str>,
) -> Result<PathBuf> {
    let relative = source.strip_prefix(source_root).with_context(|| {
        format!(
            "{} is not inside {}",
            source.display(),
            source_root.display()
        )
    })?;

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid file name: {}", source.display()))?;

    let extension = match extension {
        Some(ext) => ext.to_string(),
        None => relative
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .with_context(|| format!("file has no extension: {}", source.display()))?,
    };

    let file_name = format!("{stem}{suffix}.{extension}");
    let parent = relative.parent().unwrap_or(Path::new(""));
    Ok(output_dir.join(parent).join(file_name))
}

/// What to do with a destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Nothing there yet.
    Free,
    /// Exists and overwrite is on.
    Replace,
    /// Exists (on disk or claimed earlier in this run) and overwrite is off.
    Skip,
}

/// Hands out destination paths for one run and remembers which ones were
/// already claimed, so two sources mapping to the same name do not clobber
/// each other.
#[derive(Debug)]
pub struct OutputNamer<'a> {
    config: &'a Config,
    claimed: HashSet<PathBuf>,
}

impl<'a> OutputNamer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            claimed: HashSet::new(),
        }
    }

    pub fn destination(&self, source: &Path) -> Result<PathBuf> {
        output_path(
            source,
            &self.config.source,
            &self.config.output_dir,
            &self.config.suffix,
            self.config.format.map(|kind| kind.extension()),
        )
    }

    /// Decide whether `destination` may be written. Only destinations
    /// recorded with [`OutputNamer::claim`] count as taken by this run.
    pub fn check(&self, destination: &Path) -> Collision {
        let taken = destination.exists() || self.claimed.contains(destination);

        match (taken, self.config.overwrite) {
            (false, _) => Collision::Free,
            (true, true) => Collision::Replace,
            (true, false) => Collision::Skip,
        }
    }

    /// Record a destination that was written successfully.
    pub fn claim(&mut self, destination: &Path) {
        self.claimed.insert(destination.to_path_buf());
    }
}
