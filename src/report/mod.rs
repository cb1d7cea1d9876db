//! @ai:module:intent Result persistence and report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, CsvSink, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod csv_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use csv_report::{CsvSink, CsvSinkTrait, SinkError};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::BenchmarkSummary;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined report generator for the analysis artifacts
pub struct ReportGenerator {
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Generate the Markdown report, summary JSON and all charts
    /// @ai:effects fs:write
    pub fn generate_all(&self, summary: &BenchmarkSummary, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.markdown
            .generate(summary, &output_dir.join("benchmark_report.md"))?;

        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_dir.join("summary.json"), json)?;

        self.charts.generate_all(summary, output_dir)?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
