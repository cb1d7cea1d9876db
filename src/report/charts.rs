//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::BenchmarkSummary;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// A* configurations in red, GBFS in teal, matching the report conventions.
const ASTAR_COLOR: RGBColor = RGBColor(230, 57, 70);
const GBFS_COLOR: RGBColor = RGBColor(29, 122, 140);

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from a summary
    fn generate_all(&self, summary: &BenchmarkSummary, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates comparison charts from benchmark summaries
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Draw one bar chart with a bar per configuration
    /// @ai:effects fs:write
    fn bar_chart(
        output_path: &Path,
        caption: &str,
        y_desc: &str,
        data: &[(String, f64)],
        y_max: f64,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0..data.len() as i32, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_labels(data.len())
            .y_desc(y_desc)
            .x_desc("Configuration")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.iter().enumerate().map(|(i, (label, value))| {
            let color = if label.starts_with("astar") {
                ASTAR_COLOR
            } else {
                GBFS_COLOR
            };
            Rectangle::new([(i as i32, 0.0), (i as i32, *value)], color.mix(0.7).filled())
        }))?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Render one metric chart if any configuration has a value
    /// @ai:effects fs:write
    fn metric_chart(
        output_dir: &Path,
        file_name: &str,
        caption: &str,
        y_desc: &str,
        data: Vec<(String, f64)>,
        fixed_max: Option<f64>,
        generated: &mut Vec<String>,
    ) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let y_max = fixed_max.unwrap_or_else(|| {
            let max = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
            (max * 1.2).max(1.0)
        });

        Self::bar_chart(&output_dir.join(file_name), caption, y_desc, &data, y_max)?;
        generated.push(file_name.to_string());
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts from a summary
    /// @ai:effects fs:write
    fn generate_all(&self, summary: &BenchmarkSummary, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let label = |c: &crate::metrics::ConfigStats| format!("{}_{}", c.search, c.heuristic);
        let mut generated = Vec::new();

        Self::metric_chart(
            output_dir,
            "success_rates.png",
            "Success Rate by Algorithm and Heuristic",
            "Success Rate (%)",
            summary
                .by_config
                .iter()
                .map(|c| (label(c), c.success_rate))
                .collect(),
            Some(100.0),
            &mut generated,
        )?;

        Self::metric_chart(
            output_dir,
            "runtime_comparison.png",
            "Average Runtime by Algorithm and Heuristic (Successful Runs)",
            "Runtime (seconds)",
            summary
                .by_config
                .iter()
                .filter_map(|c| c.avg_runtime.map(|v| (label(c), v)))
                .collect(),
            None,
            &mut generated,
        )?;

        Self::metric_chart(
            output_dir,
            "plan_length_comparison.png",
            "Average Plan Length by Algorithm and Heuristic",
            "Plan Length (steps)",
            summary
                .by_config
                .iter()
                .filter_map(|c| c.avg_plan_length.map(|v| (label(c), v)))
                .collect(),
            None,
            &mut generated,
        )?;

        Self::metric_chart(
            output_dir,
            "expanded_nodes_comparison.png",
            "Average Expanded Nodes by Algorithm and Heuristic",
            "Expanded Nodes",
            summary
                .by_config
                .iter()
                .filter_map(|c| c.avg_expanded_nodes.map(|v| (label(c), v)))
                .collect(),
            None,
            &mut generated,
        )?;

        Ok(generated)
    }
}
