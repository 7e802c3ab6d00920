pub mod cli;
pub mod config;
pub mod discover;
pub mod encode;
pub mod error;
pub mod format;
pub mod geometry;
pub mod naming;
pub mod pipeline;
pub mod report;

pub use cli::Cli;
pub use config::{Config, Dimensions, MetadataPolicy, ResizeMode, UpscalePolicy};
pub use discover::{Discovery, discover_images};
pub use error::ConfigError;
pub use format::ImageKind;
pub use geometry::target_dimensions;
pub use naming::{Collision, OutputNamer};
pub use pipeline::{ImageJob, process_image};
pub use report::{Outcome, RunReport, TransformResult, format_size};

use anyhow::{Context, Result};
use std::fs;
use tracing::{info, warn};

/// Resize every matching image under `config.source` into `config.output_dir`.
///
/// Only failing to create the output directory aborts the run; every
/// per-file problem is recorded in the report and the loop moves on.
pub fn run_batch(config: &Config) -> Result<RunReport> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let output_dir = config
        .output_dir
        .canonicalize()
        .unwrap_or_else(|_| config.output_dir.clone());
    let mut report = RunReport::new(output_dir.clone());
    let mut namer = OutputNamer::new(config);

    let files = discover_images(Discovery {
        root: &config.source,
        recursive: config.recursive,
        include: &config.include,
        exclude: Some(output_dir),
    });

    for source in files {
        let destination = match namer.destination(&source) {
            Ok(destination) => destination,
            Err(err) => {
                warn!("failed {}: {err:#}", source.display());
                report.record(TransformResult::failed(source, None, &err));
                continue;
            }
        };

        if namer.check(&destination) == Collision::Skip {
            info!(
                "skipped {} (exists: {})",
                source.display(),
                destination.display()
            );
            report.record(TransformResult::skipped(source, destination));
            continue;
        }

        let job = ImageJob::new(source, config);
        match process_image(&job, &destination) {
            Ok(stats) => {
                namer.claim(&destination);
                info!(
                    "resized {} \u{2192} {} ({}, {} \u{2192} {})",
                    job.source.display(),
                    destination.display(),
                    stats.dimensions,
                    format_size(stats.input_bytes),
                    format_size(stats.output_bytes),
                );
                report.record(TransformResult::succeeded(job.source, destination, stats));
            }
            Err(err) => {
                warn!("failed {}: {err:#}", job.source.display());
                report.record(TransformResult::failed(job.source, Some(destination), &err));
            }
        }
    }

    Ok(report)
}
