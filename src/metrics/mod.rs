//! @ai:module:intent Benchmark record types and aggregation
//! @ai:module:public_api MetricValue, BenchmarkRecord, BenchmarkSummary, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{
    BenchmarkRecord, BenchmarkSummary, ConfigStats, DomainStats, MetricValue,
    DEFAULT_HEURISTIC_LABEL, DEFAULT_SEARCH_LABEL,
};
