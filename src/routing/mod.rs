pub mod input;
pub mod plan;
pub mod router;
pub mod strategy;

pub use input::{
    classify, is_url, validate_file, FileFacts, FileProbe, InputAnalysis, InputKind, LocalFiles,
    RoutingThresholds, ValidationError,
};
pub use plan::{group_thousands, EstimateRange, ExecutionPlan, PlanEstimator};
pub use router::{RoutingDecision, StrategyRouter};
pub use strategy::{DefaultStrategy, Strategy};
