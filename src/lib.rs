//! @ai:module:intent PDDL planner benchmark suite library
//! @ai:module:layer application
//! @ai:module:public_api config, corpus, metrics, report, runner

pub mod config;
pub mod corpus;
pub mod metrics;
pub mod report;
pub mod runner;

pub use config::BenchmarkConfig;
pub use corpus::{CorpusWalker, DomainResolver, FileClassifier};
pub use metrics::{BenchmarkRecord, BenchmarkSummary, MetricValue, MetricsAggregator};
pub use report::{CsvSink, ReportGenerator};
pub use runner::{MockPlannerRunner, PlannerRunner, PlannerRunnerTrait};
