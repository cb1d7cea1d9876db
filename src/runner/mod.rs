//! @ai:module:intent Planner subprocess execution
//! @ai:module:public_api PlannerRunner, MockPlannerRunner, OutputParser

pub mod planner;

pub use planner::{MockPlannerRunner, OutputParser, PlannerRunner, PlannerRunnerTrait};
