use crate::error::ConfigError;
use image::ImageFormat;
use std::path::Path;

/// Image formats the resizer reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    Gif,
}

impl ImageKind {
    pub const ALL: [ImageKind; 6] = [
        Self::Jpeg,
        Self::Png,
        Self::WebP,
        Self::Bmp,
        Self::Tiff,
        Self::Gif,
    ];

    pub fn from_extension(extension: &str) -> Result<Self, ConfigError> {
        match normalize_extension(extension)?.as_str() {
            "jpg" | "jpeg" | "jpe" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            "gif" => Ok(Self::Gif),
            other => Err(ConfigError::UnknownExtension(other.to_string())),
        }
    }

    /// Kind of a file on disk, judged by its extension alone.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_extension(ext).ok())
    }

    /// Extension written when this kind is forced with `--ext`.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Gif => "gif",
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Whether `--quality` has any effect on the encoder.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
            Self::Gif => ImageFormat::Gif,
        }
    }
}

pub fn normalize_extension(extension: &str) -> Result<String, ConfigError> {
    let extension = extension.trim().trim_start_matches('.');
    if extension.is_empty() {
        return Err(ConfigError::EmptyExtension);
    }
    Ok(extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_supported_extensions() {
        assert_eq!(ImageKind::from_extension("jpg").unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_extension("JPEG").unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_extension(".png").unwrap(), ImageKind::Png);
        assert_eq!(ImageKind::from_extension("WebP").unwrap(), ImageKind::WebP);
        assert_eq!(ImageKind::from_extension("bmp").unwrap(), ImageKind::Bmp);
        assert_eq!(ImageKind::from_extension("tif").unwrap(), ImageKind::Tiff);
        assert_eq!(ImageKind::from_extension("tiff").unwrap(), ImageKind::Tiff);
        assert_eq!(ImageKind::from_extension("gif").unwrap(), ImageKind::Gif);
    }

    #[test]
    fn reject_unknown_extension() {
        assert_eq!(
            ImageKind::from_extension("avif"),
            Err(ConfigError::UnknownExtension("avif".to_string()))
        );
        assert!(ImageKind::from_extension("txt").is_err());
    }

    #[test]
    fn normalize_extension_values() {
        assert_eq!(normalize_extension(" JPG ").unwrap(), "jpg");
        assert_eq!(normalize_extension(".WebP").unwrap(), "webp");
    }

    #[test]
    fn reject_empty_extension() {
        assert_eq!(normalize_extension(""), Err(ConfigError::EmptyExtension));
        assert_eq!(normalize_extension("  "), Err(ConfigError::EmptyExtension));
        assert_eq!(normalize_extension("."), Err(ConfigError::EmptyExtension));
    }

    #[test]
    fn kind_from_path_is_case_insensitive() {
        assert_eq!(ImageKind::from_path(Path::new("a/B.JPG")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn only_jpeg_lacks_alpha() {
        for kind in ImageKind::ALL {
            assert_eq!(kind.supports_alpha(), kind != ImageKind::Jpeg);
        }
        assert!(ImageKind::WebP.is_lossy());
        assert!(!ImageKind::Png.is_lossy());
    }
}
