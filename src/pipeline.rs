use crate::config::ConfigStore;
use crate::executor::{AnalysisExecutor, AnalysisResult, ApiCredentials, CallTimeouts, FailureReport};
use crate::fallback::FallbackOrchestrator;
use crate::routing::{RoutingDecision, Strategy, StrategyRouter};
use crate::transport::ChatTransport;
use crate::utils::logging::{log_analysis_complete, log_routing_decision};
use crate::utils::{CallSpinner, Error};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

pub const DEFAULT_QUESTION: &str = "Analyze this video in detail, including the visuals, audio, \
     on-screen text, theme and any other information it contains";
pub const DEFAULT_IMAGE_QUESTION: &str = "Describe this image";

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub question: String,
    /// Per-request switch; fallback also needs `auto_fallback` in preferences
    pub allow_fallback: bool,
    pub show_spinner: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            allow_fallback: true,
            show_spinner: false,
        }
    }
}

/// Routes an input, runs the selected strategy with fallback, and turns
/// every failure into a `Failure` result.
pub struct SmartAnalyzer<'a> {
    store: &'a ConfigStore,
    router: StrategyRouter,
    transport: Arc<dyn ChatTransport>,
    scratch_root: PathBuf,
    timeouts: CallTimeouts,
}

impl<'a> SmartAnalyzer<'a> {
    pub fn new(store: &'a ConfigStore, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            store,
            router: StrategyRouter::new(store.preferences().clone()),
            transport,
            scratch_root: std::env::temp_dir(),
            timeouts: CallTimeouts::default(),
        }
    }

    pub fn with_router(mut self, router: StrategyRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.scratch_root = root.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: CallTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn router(&self) -> &StrategyRouter {
        &self.router
    }

    pub fn route(&self, input: &str, question: &str) -> RoutingDecision {
        let decision = self.router.route(input, Some(question));
        log_routing_decision(&decision);
        decision
    }

    pub async fn analyze(&self, input: &str, options: &AnalyzeOptions) -> AnalysisResult {
        let decision = self.route(input, &options.question);
        self.execute(&decision, options).await
    }

    /// Runs a decision produced by [`SmartAnalyzer::route`].
    pub async fn execute(&self, decision: &RoutingDecision, options: &AnalyzeOptions) -> AnalysisResult {
        let strategy = match decision.strategy {
            None => {
                return AnalysisResult::failure(
                    decision
                        .analysis
                        .error
                        .clone()
                        .unwrap_or_else(|| "invalid input".to_string()),
                )
            }
            Some(Strategy::UploadRecommend) => {
                return AnalysisResult::Failure(FailureReport {
                    error: "file too large to submit inline; upload it to object storage first"
                        .to_string(),
                    tried_strategies: None,
                    recommendations: Some(decision.recommendations.clone()),
                })
            }
            Some(strategy) => strategy,
        };

        let executor = match self.executor() {
            Ok(executor) => executor,
            Err(e) => return AnalysisResult::failure(e.to_string()),
        };

        let preferences = self.router.preferences();
        let orchestrator = FallbackOrchestrator::from_preferences(preferences);
        let orchestrator = if options.allow_fallback {
            orchestrator
        } else {
            FallbackOrchestrator::new(orchestrator.table().clone(), false)
        };

        let spinner = CallSpinner::new(options.show_spinner);
        spinner.start(&format!("Waiting for {} analysis", strategy.label()));
        let started = Instant::now();

        let outcome = orchestrator
            .run(&executor, strategy, &decision.analysis.input, &options.question)
            .await;
        spinner.finish();

        match outcome.result {
            Ok(result) => {
                if let Some(last) = outcome.tried.last() {
                    log_analysis_complete(*last, started.elapsed());
                }
                result
            }
            Err(Error::Exhausted) => {
                let names: Vec<&str> = outcome.tried.iter().map(Strategy::as_str).collect();
                error!("All strategies failed: {}", names.join(", "));
                AnalysisResult::Failure(FailureReport {
                    error: "all strategies failed".to_string(),
                    tried_strategies: Some(outcome.tried),
                    recommendations: None,
                })
            }
            Err(e) => AnalysisResult::Failure(FailureReport {
                error: e.to_string(),
                tried_strategies: Some(outcome.tried),
                recommendations: None,
            }),
        }
    }

    /// One image question; no routing and no fallback.
    pub async fn describe_image(
        &self,
        image_url: &str,
        question: &str,
        show_spinner: bool,
    ) -> AnalysisResult {
        let executor = match self.executor() {
            Ok(executor) => executor,
            Err(e) => return AnalysisResult::failure(e.to_string()),
        };

        let spinner = CallSpinner::new(show_spinner);
        spinner.start("Waiting for image analysis");
        let result = executor.describe_image(image_url, question).await;
        spinner.finish();
        into_result(result)
    }

    /// One text-only chat turn; `model` overrides the default text model.
    pub async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
        show_spinner: bool,
    ) -> AnalysisResult {
        let executor = match self.executor() {
            Ok(executor) => executor,
            Err(e) => return AnalysisResult::failure(e.to_string()),
        };

        let spinner = CallSpinner::new(show_spinner);
        spinner.start("Waiting for text generation");
        let result = executor.generate_text(prompt, model).await;
        spinner.finish();
        into_result(result)
    }

    /// Fails with a configuration error before any call is made.
    fn executor(&self) -> crate::utils::Result<AnalysisExecutor> {
        let credentials = ApiCredentials::from_store(self.store).map_err(|e| {
            error!("{}", e);
            e
        })?;
        Ok(AnalysisExecutor::new(self.transport.clone(), credentials)
            .with_scratch_root(self.scratch_root.clone())
            .with_timeouts(self.timeouts))
    }
}

fn into_result(result: crate::utils::Result<AnalysisResult>) -> AnalysisResult {
    result.unwrap_or_else(|e| {
        error!("{}", e);
        AnalysisResult::failure(e.to_string())
    })
}
