use std::path::PathBuf;

/// Validation failures raised while turning command-line options into a
/// [`Config`](crate::Config). Nothing is touched on disk when one of these
/// is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("size must be WIDTHxHEIGHT with positive integers (example: 1280x1280), got {0:?}")]
    InvalidSize(String),

    #[error("unsupported image extension: {0:?}")]
    UnknownExtension(String),

    #[error("format/extension cannot be empty")]
    EmptyExtension,

    #[error("{0} and {1} cannot be used together")]
    ConflictingFlags(&'static str, &'static str),

    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u32),

    #[error("source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
}
