use crate::config::Dimensions;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Skipped,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Stats for a written image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub dimensions: Dimensions,
}

/// Result of processing one source file
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub outcome: Outcome,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub error: Option<String>,
    pub stats: Option<WriteStats>,
}

impl TransformResult {
    pub fn succeeded(source: PathBuf, destination: PathBuf, stats: WriteStats) -> Self {
        Self {
            outcome: Outcome::Succeeded,
            source,
            destination: Some(destination),
            error: None,
            stats: Some(stats),
        }
    }

    pub fn skipped(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            outcome: Outcome::Skipped,
            source,
            destination: Some(destination),
            error: None,
            stats: None,
        }
    }

    pub fn failed(source: PathBuf, destination: Option<PathBuf>, err: &anyhow::Error) -> Self {
        let mut detail = format!("{err:#}");
        if detail.is_empty() {
            detail = "unknown error".to_string();
        }
        Self {
            outcome: Outcome::Failed,
            source,
            destination,
            error: Some(detail),
            stats: None,
        }
    }
}

/// Batch operation report
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub results: Vec<TransformResult>,
    pub output_dir: PathBuf,
}

impl RunReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            results: Vec::new(),
            output_dir,
        }
    }

    pub fn record(&mut self, result: TransformResult) {
        self.results.push(result);
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransformResult> {
        self.results.iter().filter(|r| r.outcome == Outcome::Failed)
    }

    pub fn total_input_bytes(&self) -> u64 {
        self.results
            .iter()
            .filter_map(|r| r.stats)
            .map(|s| s.input_bytes)
            .sum()
    }

    pub fn total_output_bytes(&self) -> u64 {
        self.results
            .iter()
            .filter_map(|r| r.stats)
            .map(|s| s.output_bytes)
            .sum()
    }

    /// Human readable summary, one failure per line after the totals.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.results.is_empty() {
            out.push_str("No images found.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "done: succeeded={}, skipped={}, failed={} ({} \u{2192} {}). Output: {}",
            self.count(Outcome::Succeeded),
            self.count(Outcome::Skipped),
            self.count(Outcome::Failed),
            format_size(self.total_input_bytes()),
            format_size(self.total_output_bytes()),
            self.output_dir.display(),
        );
        for failure in self.failures() {
            let _ = writeln!(
                out,
                "  failed {}: {}",
                failure.source.display(),
                failure.error.as_deref().unwrap_or_default(),
            );
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let results: Vec<Value> = self
            .results
            .iter()
            .map(|r| {
                json!({
                    "outcome": r.outcome.as_str(),
                    "source": r.source.display().to_string(),
                    "destination": r.destination.as_ref().map(|d| d.display().to_string()),
                    "error": r.error,
                    "width": r.stats.map(|s| s.dimensions.width),
                    "height": r.stats.map(|s| s.dimensions.height),
                    "input_bytes": r.stats.map(|s| s.input_bytes),
                    "output_bytes": r.stats.map(|s| s.output_bytes),
                })
            })
            .collect();

        json!({
            "output_dir": self.output_dir.display().to_string(),
            "succeeded": self.count(Outcome::Succeeded),
            "skipped": self.count(Outcome::Skipped),
            "failed": self.count(Outcome::Failed),
            "total_input_bytes": self.total_input_bytes(),
            "total_output_bytes": self.total_output_bytes(),
            "results": results,
        })
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.0} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunReport {
        let mut report = RunReport::new(PathBuf::from("out"));
        report.record(TransformResult::succeeded(
            PathBuf::from("in/a.jpg"),
            PathBuf::from("out/a_10x10.jpg"),
            WriteStats {
                input_bytes: 2_000,
                output_bytes: 500,
                dimensions: Dimensions::new(10, 10),
            },
        ));
        report.record(TransformResult::skipped(
            PathBuf::from("in/b.jpg"),
            PathBuf::from("out/b_10x10.jpg"),
        ));
        report.record(TransformResult::failed(
            PathBuf::from("in/c.jpg"),
            None,
            &anyhow::anyhow!("failed to decode image"),
        ));
        report
    }

    #[test]
    fn counts_by_outcome() {
        let report = sample();
        assert_eq!(report.count(Outcome::Succeeded), 1);
        assert_eq!(report.count(Outcome::Skipped), 1);
        assert_eq!(report.count(Outcome::Failed), 1);
        assert_eq!(report.total_input_bytes(), 2_000);
        assert_eq!(report.total_output_bytes(), 500);
    }

    #[test]
    fn summary_lists_failures() {
        let summary = sample().summary();
        assert!(summary.starts_with("done: succeeded=1, skipped=1, failed=1"));
        assert!(summary.contains("failed in/c.jpg: failed to decode image"));
    }

    #[test]
    fn empty_run_summary() {
        assert_eq!(RunReport::new(PathBuf::from("out")).summary(), "No images found.\n");
    }

    #[test]
    fn failure_detail_keeps_context_chain() {
        let err = anyhow::anyhow!("bad header").context("failed to decode image");
        let result = TransformResult::failed(PathBuf::from("x.png"), None, &err);
        assert_eq!(result.error.as_deref(), Some("failed to decode image: bad header"));
    }

    #[test]
    fn json_summary_shape() {
        let value = sample().to_json();
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"].as_array().unwrap().len(), 3);
        assert_eq!(value["results"][0]["width"], 10);
        assert_eq!(value["results"][2]["outcome"], "failed");
        assert!(value["results"][1]["error"].is_null());
    }

    #[test]
    fn format_size_display() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1_500), "2 KB");
        assert_eq!(format_size(2_400_000), "2.4 MB");
    }
}
