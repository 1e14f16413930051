use crate::config::Preferences;
use crate::executor::{AnalysisExecutor, AnalysisResult};
use crate::routing::Strategy;
use crate::utils::logging::log_strategy_failure;
use crate::utils::{Error, Result};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Ordered downgrade candidates for each strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTable {
    edges: BTreeMap<Strategy, Vec<Strategy>>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        let mut edges = BTreeMap::new();
        edges.insert(Strategy::Base64Large, vec![Strategy::Base64Small]);
        Self { edges }
    }
}

impl FallbackTable {
    pub fn empty() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        match &preferences.fallback_table {
            Some(edges) => Self {
                edges: edges.clone(),
            },
            None => Self::default(),
        }
    }

    pub fn with_edge(mut self, from: Strategy, candidates: Vec<Strategy>) -> Self {
        self.edges.insert(from, candidates);
        self
    }

    pub fn candidates(&self, strategy: Strategy) -> &[Strategy] {
        self.edges.get(&strategy).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Result of running a primary strategy and its downgrades.
#[derive(Debug)]
pub struct FallbackOutcome {
    pub result: Result<AnalysisResult>,
    /// Every strategy executed, in order, primary first
    pub tried: Vec<Strategy>,
}

impl FallbackOutcome {
    pub fn tried_names(&self) -> Vec<String> {
        self.tried.iter().map(|s| s.to_string()).collect()
    }
}

/// Runs one strategy and, on a call failure, walks the downgrade table.
///
/// Candidates run strictly one after another and no strategy runs twice.
/// Configuration and validation errors end the chain immediately.
pub struct FallbackOrchestrator {
    table: FallbackTable,
    enabled: bool,
}

impl FallbackOrchestrator {
    pub fn new(table: FallbackTable, enabled: bool) -> Self {
        Self { table, enabled }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self::new(
            FallbackTable::from_preferences(preferences),
            preferences.auto_fallback,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn table(&self) -> &FallbackTable {
        &self.table
    }

    pub async fn run(
        &self,
        executor: &AnalysisExecutor,
        primary: Strategy,
        input: &str,
        question: &str,
    ) -> FallbackOutcome {
        let mut tried = vec![primary];
        info!("Trying strategy: {}", primary);

        let error = match executor.execute(primary, input, question).await {
            Ok(result) => {
                return FallbackOutcome {
                    result: Ok(result),
                    tried,
                }
            }
            Err(e) => e,
        };
        log_strategy_failure(primary, &error.to_string());

        if !self.enabled || !error.is_retryable() {
            return FallbackOutcome {
                result: Err(error),
                tried,
            };
        }

        for &candidate in self.table.candidates(primary) {
            if tried.contains(&candidate) || !candidate.is_executable() {
                continue;
            }
            if primary == Strategy::Base64Large && candidate == Strategy::Base64Small {
                warn!("Falling back from base64_large to base64_small with the same oversized file");
            }

            tried.push(candidate);
            info!("Trying fallback strategy: {}", candidate);

            match executor.execute(candidate, input, question).await {
                Ok(result) => {
                    return FallbackOutcome {
                        result: Ok(result),
                        tried,
                    }
                }
                Err(e) => {
                    log_strategy_failure(candidate, &e.to_string());
                    if !e.is_retryable() {
                        return FallbackOutcome {
                            result: Err(e),
                            tried,
                        };
                    }
                }
            }
        }

        FallbackOutcome {
            result: Err(Error::Exhausted),
            tried,
        }
    }
}
