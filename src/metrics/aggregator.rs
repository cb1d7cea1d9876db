//! @ai:module:intent Aggregate run records into per-configuration and per-domain statistics
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator
//! @ai:module:stateless true

use crate::metrics::types::{BenchmarkRecord, BenchmarkSummary, ConfigStats, DomainStats};

/// @ai:intent Trait for aggregating benchmark records
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Build a summary from a record sequence
    fn aggregate(&self, records: &[BenchmarkRecord]) -> BenchmarkSummary;
}

/// @ai:intent Aggregates benchmark records into comparison statistics
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Compute stats for records sharing one (search, heuristic) pair
    /// @ai:effects pure
    fn config_stats(search: &str, heuristic: &str, runs: &[&BenchmarkRecord]) -> ConfigStats {
        let successes: Vec<_> = runs.iter().filter(|r| r.success).collect();

        // Sentinel metrics never enter the averages, only numeric counts do.
        let expanded: Vec<u64> = successes
            .iter()
            .filter_map(|r| r.expanded_nodes.as_count())
            .collect();
        let lengths: Vec<u64> = successes
            .iter()
            .filter_map(|r| r.plan_length.as_count())
            .collect();

        ConfigStats {
            search: search.to_string(),
            heuristic: heuristic.to_string(),
            runs: runs.len() as u32,
            successes: successes.len() as u32,
            success_rate: rate(successes.len(), runs.len()),
            avg_runtime: mean(successes.iter().map(|r| r.runtime)),
            avg_expanded_nodes: mean(expanded.iter().map(|n| *n as f64)),
            avg_plan_length: mean(lengths.iter().map(|n| *n as f64)),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Build a summary from a record sequence
    ///
    /// Grouping keys keep first-seen order, so the summary follows the
    /// traversal order of the batch that produced the records.
    /// @ai:effects pure
    fn aggregate(&self, records: &[BenchmarkRecord]) -> BenchmarkSummary {
        let mut config_keys: Vec<(String, String)> = Vec::new();
        let mut domain_keys: Vec<String> = Vec::new();
        let mut searches: Vec<String> = Vec::new();
        let mut heuristics: Vec<String> = Vec::new();
        let mut problems: Vec<(String, String)> = Vec::new();

        for record in records {
            let config_key = (record.search.clone(), record.heuristic.clone());
            if !config_keys.contains(&config_key) {
                config_keys.push(config_key);
            }
            if !domain_keys.contains(&record.domain) {
                domain_keys.push(record.domain.clone());
            }
            if !searches.contains(&record.search) {
                searches.push(record.search.clone());
            }
            if !heuristics.contains(&record.heuristic) {
                heuristics.push(record.heuristic.clone());
            }
            let problem_key = (record.domain.clone(), record.problem.clone());
            if !problems.contains(&problem_key) {
                problems.push(problem_key);
            }
        }

        let by_config = config_keys
            .iter()
            .map(|(search, heuristic)| {
                let runs: Vec<&BenchmarkRecord> = records
                    .iter()
                    .filter(|r| &r.search == search && &r.heuristic == heuristic)
                    .collect();
                Self::config_stats(search, heuristic, &runs)
            })
            .collect();

        let by_domain = domain_keys
            .iter()
            .map(|domain| {
                let runs: Vec<&BenchmarkRecord> =
                    records.iter().filter(|r| &r.domain == domain).collect();
                let successes = runs.iter().filter(|r| r.success).count();
                DomainStats {
                    domain: domain.clone(),
                    runs: runs.len() as u32,
                    successes: successes as u32,
                    success_rate: rate(successes, runs.len()),
                }
            })
            .collect();

        BenchmarkSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_runs: records.len() as u32,
            problems: problems.len() as u32,
            domains: domain_keys.len() as u32,
            searches,
            heuristics,
            by_config,
            by_domain,
        }
    }
}

/// @ai:intent Success count as a percentage of runs
/// @ai:effects pure
fn rate(successes: usize, runs: usize) -> f64 {
    if runs == 0 {
        0.0
    } else {
        successes as f64 / runs as f64 * 100.0
    }
}

/// @ai:intent Mean of an iterator, None when empty
/// @ai:effects pure
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.iter().sum::<f64>() / collected.len() as f64)
    }
}
