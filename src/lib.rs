pub mod cli;
pub mod config;
pub mod executor;
pub mod fallback;
pub mod pipeline;
pub mod report;
pub mod routing;
pub mod transport;
pub mod utils;

pub use config::{ConfigStore, Preferences};
pub use executor::{AnalysisExecutor, AnalysisResult};
pub use fallback::{FallbackOrchestrator, FallbackTable};
pub use pipeline::{AnalyzeOptions, SmartAnalyzer};
pub use routing::{RoutingDecision, Strategy, StrategyRouter};
pub use utils::{Error, Result};
