//! @ai:module:intent Markdown analysis report for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{BenchmarkSummary, ConfigStats};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate a Markdown report from a summary
    fn generate(&self, summary: &BenchmarkSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates the Markdown analysis report
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format an optional average, N/A when absent
    /// @ai:effects pure
    fn format_avg(value: Option<f64>, precision: usize) -> String {
        match value {
            Some(v) => format!("{:.*}", precision, v),
            None => "N/A".to_string(),
        }
    }

    /// @ai:intent Generate the header and overall statistics section
    /// @ai:effects pure
    fn generate_overview(summary: &BenchmarkSummary) -> String {
        let mut output = String::new();

        writeln!(output, "# Benchmark Results Analysis").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", summary.timestamp).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "## Overall Statistics").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "- Total runs: {}", summary.total_runs).unwrap();
        writeln!(output, "- Problems tested: {}", summary.problems).unwrap();
        writeln!(output, "- Domains tested: {}", summary.domains).unwrap();
        writeln!(
            output,
            "- Algorithms tested: {}",
            summary.searches.join(", ")
        )
        .unwrap();
        writeln!(
            output,
            "- Heuristics tested: {}",
            summary.heuristics.join(", ")
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate the per-configuration results table
    /// @ai:effects pure
    fn generate_config_table(summary: &BenchmarkSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Results by Configuration").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Search | Heuristic | Success Rate | Avg Runtime | Avg Plan Length | Avg Expanded Nodes |"
        )
        .unwrap();
        writeln!(
            output,
            "|--------|-----------|--------------|-------------|-----------------|--------------------|"
        )
        .unwrap();

        for stats in &summary.by_config {
            writeln!(
                output,
                "| {} | {} | {:.1}% | {}s | {} | {} |",
                stats.search,
                stats.heuristic,
                stats.success_rate,
                Self::format_avg(stats.avg_runtime, 3),
                Self::format_avg(stats.avg_plan_length, 1),
                Self::format_avg(stats.avg_expanded_nodes, 1)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate the per-domain success table
    /// @ai:effects pure
    fn generate_domain_table(summary: &BenchmarkSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Results by Domain").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Domain | Runs | Successes | Success Rate |").unwrap();
        writeln!(output, "|--------|------|-----------|--------------|").unwrap();

        for domain in &summary.by_domain {
            writeln!(
                output,
                "| {} | {} | {} | {:.1}% |",
                domain.domain, domain.runs, domain.successes, domain.success_rate
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate the A* vs GBFS h_max head-to-head section
    ///
    /// The central question of the benchmark; omitted when either
    /// configuration was not part of the batch.
    /// @ai:effects pure
    fn generate_key_comparison(summary: &BenchmarkSummary) -> String {
        let (Some(astar), Some(gbfs)) = (
            summary.config("astar", "hmax"),
            summary.config("gbf", "hmax"),
        ) else {
            return String::new();
        };

        let mut output = String::new();

        writeln!(output, "## A* vs GBFS with h_max (Key Comparison)").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Success Rate: A*+h_max: {:.1}%, GBFS+h_max: {:.1}%",
            astar.success_rate, gbfs.success_rate
        )
        .unwrap();
        writeln!(
            output,
            "Average Runtime: A*+h_max: {}s, GBFS+h_max: {}s",
            Self::format_avg(astar.avg_runtime, 3),
            Self::format_avg(gbfs.avg_runtime, 3)
        )
        .unwrap();
        writeln!(
            output,
            "Average Plan Length: A*+h_max: {}, GBFS+h_max: {}",
            Self::format_avg(astar.avg_plan_length, 1),
            Self::format_avg(gbfs.avg_plan_length, 1)
        )
        .unwrap();
        writeln!(
            output,
            "Average Expanded Nodes: A*+h_max: {}, GBFS+h_max: {}",
            Self::format_avg(astar.avg_expanded_nodes, 1),
            Self::format_avg(gbfs.avg_expanded_nodes, 1)
        )
        .unwrap();
        writeln!(output).unwrap();

        writeln!(output, "### Analysis").unwrap();
        writeln!(output).unwrap();
        output.push_str(&Self::compare_rates(astar, gbfs));
        output.push_str(&Self::compare_averages(astar, gbfs));

        output
    }

    /// @ai:intent Prose comparison of success rates
    /// @ai:effects pure
    fn compare_rates(astar: &ConfigStats, gbfs: &ConfigStats) -> String {
        let diff = astar.success_rate - gbfs.success_rate;

        if diff > 0.0 {
            format!(
                "A* with h_max has a higher success rate than GBFS with h_max by {:.1} percentage points.\n",
                diff
            )
        } else if diff < 0.0 {
            format!(
                "GBFS with h_max has a higher success rate than A* with h_max by {:.1} percentage points.\n",
                -diff
            )
        } else {
            "A* and GBFS with h_max have the same success rate.\n".to_string()
        }
    }

    /// @ai:intent Prose comparison of runtime, plan length and expanded nodes
    /// @ai:effects pure
    fn compare_averages(astar: &ConfigStats, gbfs: &ConfigStats) -> String {
        let mut output = String::new();

        if let (Some(a), Some(g)) = (astar.avg_runtime, gbfs.avg_runtime) {
            if a < g {
                writeln!(
                    output,
                    "A* with h_max is faster than GBFS with h_max by {:.3} seconds on average.",
                    g - a
                )
                .unwrap();
            } else if g < a {
                writeln!(
                    output,
                    "GBFS with h_max is faster than A* with h_max by {:.3} seconds on average.",
                    a - g
                )
                .unwrap();
            } else {
                writeln!(output, "A* and GBFS with h_max have the same average runtime.").unwrap();
            }
        }

        if let (Some(a), Some(g)) = (astar.avg_plan_length, gbfs.avg_plan_length) {
            if a < g {
                writeln!(
                    output,
                    "A* with h_max produces shorter plans than GBFS with h_max by {:.1} steps on average.",
                    g - a
                )
                .unwrap();
            } else if g < a {
                writeln!(
                    output,
                    "GBFS with h_max produces shorter plans than A* with h_max by {:.1} steps on average.",
                    a - g
                )
                .unwrap();
            }
        }

        if let (Some(a), Some(g)) = (astar.avg_expanded_nodes, gbfs.avg_expanded_nodes) {
            if a < g {
                writeln!(
                    output,
                    "A* with h_max expands fewer nodes than GBFS with h_max by {:.1} nodes on average.",
                    g - a
                )
                .unwrap();
            } else if g < a {
                writeln!(
                    output,
                    "GBFS with h_max expands fewer nodes than A* with h_max by {:.1} nodes on average.",
                    a - g
                )
                .unwrap();
            }
        }

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate a Markdown report from a summary
    /// @ai:effects fs:write
    fn generate(&self, summary: &BenchmarkSummary, output_path: &Path) -> Result<()> {
        let mut report = String::new();
        report.push_str(&Self::generate_overview(summary));
        report.push_str(&Self::generate_config_table(summary));
        report.push_str(&Self::generate_domain_table(summary));
        report.push_str(&Self::generate_key_comparison(summary));

        std::fs::write(output_path, report)?;
        Ok(())
    }
}
