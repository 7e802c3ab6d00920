use crate::config::MetadataPolicy;
use crate::format::ImageKind;
use anyhow::{Context, Result, anyhow};
use image::{DynamicImage, RgbImage};
use std::io::Cursor;

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Encoder knobs taken from the run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub quality: u8,
    pub png_optimize: bool,
    pub metadata: MetadataPolicy,
}

/// Metadata captured at decode time, carried over when preserving.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub exif: Option<Vec<u8>>,
    pub icc: Option<Vec<u8>>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.icc.is_none()
    }
}

pub fn encode(
    image: &DynamicImage,
    kind: ImageKind,
    settings: &EncodeSettings,
    metadata: &Metadata,
) -> Result<Vec<u8>> {
    match kind {
        ImageKind::Jpeg => encode_jpeg(image, settings, metadata),
        ImageKind::Png => {
            let png = encode_with_image(image, kind)?;
            if settings.png_optimize {
                optimize_png(&png, settings.metadata)
            } else {
                Ok(png)
            }
        }
        ImageKind::WebP => encode_webp(image, settings),
        ImageKind::Bmp | ImageKind::Tiff | ImageKind::Gif => encode_with_image(image, kind),
    }
}

// ---------------------------------------------------------------------------
// Format-specific encoders
// ---------------------------------------------------------------------------

fn encode_jpeg(
    image: &DynamicImage,
    settings: &EncodeSettings,
    metadata: &Metadata,
) -> Result<Vec<u8>> {
    let rgb = flatten_onto_white(image);
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let pixels = rgb.as_raw();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width, height);
    comp.set_quality(settings.quality as f32);
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    if settings.metadata == MetadataPolicy::Preserve {
        if let Some(exif) = &metadata.exif {
            comp.write_marker(mozjpeg::Marker::APP(1), &exif_segment(exif));
        }
        if let Some(icc) = &metadata.icc {
            comp.write_icc_profile(icc);
        }
    }
    comp.write_scanlines(pixels)
        .context("failed to write JPEG scanlines")?;
    let result = comp.finish()?;

    Ok(result)
}

/// Runs oxipng over an encoded PNG. Ancillary chunks are dropped when
/// stripping and kept as-is otherwise.
pub fn optimize_png(png_bytes: &[u8], metadata: MetadataPolicy) -> Result<Vec<u8>> {
    let mut opts = oxipng::Options::from_preset(2);
    opts.strip = match metadata {
        MetadataPolicy::Strip => oxipng::StripChunks::Safe,
        MetadataPolicy::Preserve => oxipng::StripChunks::None,
    };

    oxipng::optimize_from_memory(png_bytes, &opts).context("PNG optimization failed")
}

fn encode_webp(image: &DynamicImage, settings: &EncodeSettings) -> Result<Vec<u8>> {
    let quality = settings.quality as f32;

    let memory = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
    } else {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
    };
    let memory = memory.map_err(|e| anyhow!("WebP encoding failed: {e:?}"))?;

    Ok(memory.to_vec())
}

fn encode_with_image(image: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>> {
    let normalized = to_8bit(image, kind);
    let mut buf = Vec::new();
    normalized
        .write_to(&mut Cursor::new(&mut buf), kind.image_format())
        .with_context(|| format!("failed to encode {kind:?}"))?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Composite onto opaque white, dropping the alpha channel.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as u32;
        for channel in 0..3 {
            let blended = src[channel] as u32 * alpha + 255 * (255 - alpha);
            dst[channel] = ((blended + 127) / 255) as u8;
        }
    }
    out
}

/// 8-bit RGB or RGBA, which every `image` encoder we use accepts. GIF is
/// always written as RGBA.
fn to_8bit(image: &DynamicImage, kind: ImageKind) -> DynamicImage {
    if image.color().has_alpha() || kind == ImageKind::Gif {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

/// APP1 payload for an EXIF blob, with the `Exif\0\0` header added when
/// the decoder returned bare TIFF data.
fn exif_segment(exif: &[u8]) -> Vec<u8> {
    if exif.starts_with(EXIF_HEADER) {
        return exif.to_vec();
    }
    let mut segment = Vec::with_capacity(EXIF_HEADER.len() + exif.len());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(exif);
    segment
}
