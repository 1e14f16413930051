//! Logging helpers for the recurring pipeline events

use crate::routing::{RoutingDecision, Strategy};

pub fn log_routing_decision(decision: &RoutingDecision) {
    match decision.strategy {
        Some(strategy) => tracing::info!("Selected strategy: {}", strategy),
        None => tracing::warn!(
            "Input rejected: {}",
            decision.analysis.error.as_deref().unwrap_or("unknown reason")
        ),
    }

    for warning in &decision.warnings {
        tracing::debug!("Routing warning: {}", warning);
    }
}

pub fn log_strategy_failure(strategy: Strategy, error: &str) {
    tracing::error!("{} STRATEGY FAILED: {}", strategy, error);
}

pub fn log_analysis_complete(strategy: Strategy, elapsed: std::time::Duration) {
    tracing::info!(
        "Analysis completed with {} in {:.1}s",
        strategy,
        elapsed.as_secs_f64()
    );
}
