//! @ai:module:intent Record and sentinel types for planner benchmark runs
//! @ai:module:layer domain
//! @ai:module:public_api MetricValue, BenchmarkRecord, ConfigStats, DomainStats, BenchmarkSummary
//! @ai:module:stateless true

use serde::{Serialize, Serializer};
use std::fmt;

/// @ai:intent Label recorded when no search algorithm was selected
pub const DEFAULT_SEARCH_LABEL: &str = "breadth_first_search";

/// @ai:intent Label recorded when no heuristic was selected
pub const DEFAULT_HEURISTIC_LABEL: &str = "None";

/// @ai:intent Extracted planner metric, or a sentinel for a failed run
///
/// Keeps the three-way distinction (value / timeout / invocation error)
/// explicit instead of string-sniffing a loosely typed column downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Count(u64),
    Timeout,
    Error(String),
}

impl MetricValue {
    /// @ai:intent Numeric value if this is not a sentinel
    /// @ai:effects pure
    pub fn as_count(&self) -> Option<u64> {
        match self {
            MetricValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// @ai:intent Whether this carries a failure sentinel instead of a number
    /// @ai:effects pure
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, MetricValue::Count(_))
    }

    /// @ai:intent Parse a persisted dataset field back into a metric
    ///
    /// Unknown non-numeric text is treated as an error sentinel rather than
    /// rejected, so a dataset written by another tool version still loads.
    /// @ai:effects pure
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();

        if trimmed == "timeout" {
            return MetricValue::Timeout;
        }

        if let Some(rest) = trimmed.strip_prefix("error: ") {
            return MetricValue::Error(rest.to_string());
        }

        match trimmed.parse::<u64>() {
            Ok(n) => MetricValue::Count(n),
            Err(_) => MetricValue::Error(trimmed.to_string()),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Timeout => write!(f, "timeout"),
            MetricValue::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl Serialize for MetricValue {
    /// Counts serialize as integers; sentinels as their textual markers,
    /// matching the documented dataset contract.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Count(n) => serializer.serialize_u64(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

/// @ai:intent One row of the result dataset: a single planner invocation
///
/// Field order is the persisted column order. Records are immutable once
/// created; the sink only appends.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRecord {
    pub domain: String,
    pub problem: String,
    pub search: String,
    pub heuristic: String,
    pub success: bool,
    pub runtime: f64,
    pub expanded_nodes: MetricValue,
    pub plan_length: MetricValue,
}

impl BenchmarkRecord {
    /// @ai:intent Detect a planner-contract violation: reported goal with sentinel metrics
    /// @ai:effects pure
    pub fn violates_success_contract(&self) -> bool {
        self.success && (self.expanded_nodes.is_sentinel() || self.plan_length.is_sentinel())
    }
}

/// @ai:intent Aggregated statistics for one (search, heuristic) configuration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStats {
    pub search: String,
    pub heuristic: String,
    pub runs: u32,
    pub successes: u32,
    pub success_rate: f64,
    /// Averages over successful runs only; None when nothing succeeded.
    pub avg_runtime: Option<f64>,
    pub avg_expanded_nodes: Option<f64>,
    pub avg_plan_length: Option<f64>,
}

/// @ai:intent Aggregated statistics for one benchmark domain
#[derive(Debug, Clone, Serialize)]
pub struct DomainStats {
    pub domain: String,
    pub runs: u32,
    pub successes: u32,
    pub success_rate: f64,
}

/// @ai:intent Complete aggregated view of a benchmark batch
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkSummary {
    pub timestamp: String,
    pub total_runs: u32,
    pub problems: u32,
    pub domains: u32,
    pub searches: Vec<String>,
    pub heuristics: Vec<String>,
    pub by_config: Vec<ConfigStats>,
    pub by_domain: Vec<DomainStats>,
}

impl BenchmarkSummary {
    /// @ai:intent Look up stats for a specific configuration
    /// @ai:effects pure
    pub fn config(&self, search: &str, heuristic: &str) -> Option<&ConfigStats> {
        self.by_config
            .iter()
            .find(|c| c.search == search && c.heuristic == heuristic)
    }
}
