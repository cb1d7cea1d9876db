//! @ai:module:intent CSV persistence for the benchmark result dataset
//! @ai:module:layer infrastructure
//! @ai:module:public_api CsvSink, SinkError
//! @ai:module:stateless true

use crate::metrics::{BenchmarkRecord, MetricValue};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// @ai:intent Fatal persistence failure at the result sink
///
/// Everything upstream is contained and converted to data; a partially
/// written malformed dataset is worse than no dataset, so the sink is the
/// one place allowed to halt the batch.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to create dataset file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write dataset row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush dataset: {0}")]
    Flush(#[from] std::io::Error),
}

/// @ai:intent Trait for persisting and reloading result datasets
pub trait CsvSinkTrait: Send + Sync {
    /// @ai:intent Persist records as a flat CSV table with a fixed column order
    fn write(&self, records: &[BenchmarkRecord], path: &Path) -> Result<(), SinkError>;

    /// @ai:intent Load a persisted dataset back into records
    fn load(&self, path: &Path) -> Result<Vec<BenchmarkRecord>>;
}

/// @ai:intent Writes the append-only record dataset to CSV
pub struct CsvSink;

/// Raw CSV row; metric columns stay textual so sentinel values load without
/// a numeric parse failure.
#[derive(Debug, Deserialize)]
struct RawRow {
    domain: String,
    problem: String,
    search: String,
    heuristic: String,
    success: String,
    runtime: f64,
    expanded_nodes: String,
    plan_length: String,
}

impl CsvSink {
    /// @ai:intent Create a new sink
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvSinkTrait for CsvSink {
    /// @ai:intent Persist records as a flat CSV table with a fixed column order
    ///
    /// The header row comes from the record struct's field order. A
    /// success-with-sentinel record means the external planner broke its
    /// output contract; it is persisted but called out loudly.
    /// @ai:effects fs:write
    fn write(&self, records: &[BenchmarkRecord], path: &Path) -> Result<(), SinkError> {
        let mut writer = csv::Writer::from_path(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        for record in records {
            if record.violates_success_contract() {
                tracing::warn!(
                    "planner contract violation: {}/{} reported success with sentinel metrics",
                    record.domain,
                    record.problem
                );
            }
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// @ai:intent Load a persisted dataset back into records
    ///
    /// Sentinel text in the metric columns coerces back into the tagged
    /// variants instead of crashing the numeric parse.
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<Vec<BenchmarkRecord>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;

        let mut records = Vec::new();

        for row in reader.deserialize::<RawRow>() {
            let row = row.with_context(|| format!("malformed row in {}", path.display()))?;

            records.push(BenchmarkRecord {
                domain: row.domain,
                problem: row.problem,
                search: row.search,
                heuristic: row.heuristic,
                // The original Python tool wrote True/False; accept both.
                success: row.success.eq_ignore_ascii_case("true"),
                runtime: row.runtime,
                expanded_nodes: MetricValue::from_field(&row.expanded_nodes),
                plan_length: MetricValue::from_field(&row.plan_length),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_records() -> Vec<BenchmarkRecord> {
        vec![
            BenchmarkRecord {
                domain: "blocks".to_string(),
                problem: "pb1".to_string(),
                search: "astar".to_string(),
                heuristic: "hmax".to_string(),
                success: true,
                runtime: 0.25,
                expanded_nodes: MetricValue::Count(42),
                plan_length: MetricValue::Count(7),
            },
            BenchmarkRecord {
                domain: "blocks".to_string(),
                problem: "pb2".to_string(),
                search: "astar".to_string(),
                heuristic: "hmax".to_string(),
                success: false,
                runtime: 5.0,
                expanded_nodes: MetricValue::Timeout,
                plan_length: MetricValue::Timeout,
            },
        ]
    }

    #[test]
    fn test_write_produces_fixed_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");

        CsvSink::new().write(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "domain,problem,search,heuristic,success,runtime,expanded_nodes,plan_length"
        );
        assert!(content.contains("timeout"));
    }

    #[test]
    fn test_dataset_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");
        let sink = CsvSink::new();

        let written = sample_records();
        sink.write(&written, &path).unwrap();
        let loaded = sink.load(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].success);
        assert_eq!(loaded[0].expanded_nodes, MetricValue::Count(42));
        assert_eq!(loaded[1].expanded_nodes, MetricValue::Timeout);
        assert!((loaded[1].runtime - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_coerces_python_booleans() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");
        std::fs::write(
            &path,
            "domain,problem,search,heuristic,success,runtime,expanded_nodes,plan_length\n\
             blocks,pb1,astar,hmax,True,0.5,42,7\n\
             blocks,pb2,astar,hmax,False,5.0,error: boom,error: boom\n",
        )
        .unwrap();

        let loaded = CsvSink::new().load(&path).unwrap();
        assert!(loaded[0].success);
        assert!(!loaded[1].success);
        assert_eq!(
            loaded[1].plan_length,
            MetricValue::Error("boom".to_string())
        );
    }

    #[test]
    fn test_write_to_unwritable_path_is_fatal() {
        let result = CsvSink::new().write(
            &sample_records(),
            Path::new("/nonexistent-dir/results.csv"),
        );
        assert!(matches!(result, Err(SinkError::Create { .. })));
    }
}
