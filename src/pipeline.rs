use crate::config::{Config, Dimensions, MetadataPolicy};
use crate::encode::{EncodeSettings, Metadata, encode, optimize_png};
use crate::format::ImageKind;
use crate::geometry::target_dimensions;
use crate::report::WriteStats;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One source file to transform under the run configuration
#[derive(Debug, Clone)]
pub struct ImageJob<'a> {
    pub source: PathBuf,
    pub config: &'a Config,
}

impl<'a> ImageJob<'a> {
    pub fn new(source: PathBuf, config: &'a Config) -> Self {
        Self { source, config }
    }

    /// Kind written for this job: the `--ext` override, else the source's own.
    pub fn output_kind(&self) -> Result<ImageKind> {
        match self.config.format {
            Some(kind) => Ok(kind),
            None => ImageKind::from_path(&self.source).with_context(|| {
                format!("unsupported source extension: {}", self.source.display())
            }),
        }
    }

    fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.config.quality,
            png_optimize: self.config.png_optimize,
            metadata: self.config.metadata,
        }
    }
}

/// Decode, resize and encode `job.source`, writing the result to `destination`.
pub fn process_image(job: &ImageJob<'_>, destination: &Path) -> Result<WriteStats> {
    let config = job.config;
    let input_bytes = fs::read(&job.source)
        .with_context(|| format!("failed to read input file: {}", job.source.display()))?;
    let kind = job.output_kind()?;

    let keep_metadata = config.metadata == MetadataPolicy::Preserve;
    let (image, metadata, source_format) = decode(&input_bytes, keep_metadata)?;

    let original = Dimensions::new(image.width(), image.height());
    let size = target_dimensions(original, config.size, config.mode, config.upscale);
    debug!(
        "{}: {original} -> {size} ({kind:?})",
        job.source.display()
    );

    // PNG in, PNG out, nothing to resize: optimise the original bytes so
    // ancillary chunks survive when metadata is preserved.
    let output = if kind == ImageKind::Png
        && source_format == Some(ImageFormat::Png)
        && size == original
        && config.png_optimize
    {
        optimize_png(&input_bytes, config.metadata)?
    } else {
        let image = if size == original {
            image
        } else {
            image.resize_exact(size.width, size.height, FilterType::Lanczos3)
        };
        if keep_metadata && !metadata.is_empty() && kind != ImageKind::Jpeg {
            debug!("{kind:?} output does not carry EXIF/ICC; dropping it");
        }
        encode(&image, kind, &job.encode_settings(), &metadata)?
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(destination, &output)
        .with_context(|| format!("failed to write output file: {}", destination.display()))?;

    Ok(WriteStats {
        input_bytes: input_bytes.len() as u64,
        output_bytes: output.len() as u64,
        dimensions: size,
    })
}

fn decode(
    bytes: &[u8],
    keep_metadata: bool,
) -> Result<(DynamicImage, Metadata, Option<ImageFormat>)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("failed to read image header")?;
    let format = reader.format();

    let mut decoder = reader.into_decoder().context("failed to decode image")?;
    let metadata = if keep_metadata {
        Metadata {
            exif: decoder.exif_metadata().ok().flatten(),
            icc: decoder.icc_profile().ok().flatten(),
        }
    } else {
        Metadata::default()
    };

    let image = DynamicImage::from_decoder(decoder).context("failed to decode image")?;
    Ok((image, metadata, format))
}
