use super::input::{
    classify, FileProbe, InputAnalysis, InputKind, LocalFiles, RoutingThresholds, ValidationError,
};
use super::plan::{ExecutionPlan, PlanEstimator};
use super::strategy::{DefaultStrategy, Strategy};
use crate::config::Preferences;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub analysis: InputAnalysis,
    pub strategy: Option<Strategy>,
    pub plan: Option<ExecutionPlan>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RoutingDecision {
    pub fn is_executable(&self) -> bool {
        self.strategy.is_some_and(|s| s.is_executable())
    }
}

/// Chooses how a video reference is presented to the API.
///
/// Routing is a pure function of the input, the filesystem and the
/// preferences snapshot taken at construction.
pub struct StrategyRouter {
    preferences: Preferences,
    thresholds: RoutingThresholds,
    estimator: PlanEstimator,
    probe: Box<dyn FileProbe>,
}

impl StrategyRouter {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            thresholds: RoutingThresholds::default(),
            estimator: PlanEstimator::default(),
            probe: Box::new(LocalFiles),
        }
    }

    pub fn with_thresholds(mut self, thresholds: RoutingThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_estimator(mut self, estimator: PlanEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn thresholds(&self) -> &RoutingThresholds {
        &self.thresholds
    }

    pub fn classify(&self, input: &str) -> InputAnalysis {
        classify(
            self.probe.as_ref(),
            &self.thresholds,
            self.preferences.max_file_size_mb,
            input,
        )
    }

    pub fn route(&self, input: &str, question: Option<&str>) -> RoutingDecision {
        info!("Analyzing input: {}", truncate(input, 100));
        if let Some(q) = question {
            debug!("Question has {} characters", q.chars().count());
        }

        let analysis = self.classify(input);
        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        if !analysis.valid {
            warnings.push(format!(
                "invalid input: {}",
                analysis.error.as_deref().unwrap_or("unknown error")
            ));
            return RoutingDecision {
                analysis,
                strategy: None,
                plan: None,
                warnings,
                recommendations,
            };
        }

        match (self.preferences.default_strategy, analysis.kind) {
            (DefaultStrategy::UrlFirst, InputKind::File) => recommendations.push(
                "URL-first mode is enabled: host the video on object storage and analyze it \
                 by URL to save roughly 25-50% of tokens"
                    .to_string(),
            ),
            (DefaultStrategy::Base64Only, InputKind::Url) => warnings.push(
                "Base64-only mode is enabled but the input is a URL; URL mode will be used"
                    .to_string(),
            ),
            _ => {}
        }

        let strategy = analysis
            .recommended_strategy
            .unwrap_or(Strategy::UploadRecommend);
        let size = analysis.file_size_mb.unwrap_or(0.0);

        match strategy {
            Strategy::Base64Small
                if self.preferences.prefer_url
                    && self.preferences.default_strategy == DefaultStrategy::Auto =>
            {
                recommendations.push(
                    "A hosted URL avoids re-encoding the file on every request".to_string(),
                );
            }
            Strategy::Base64Large if self.preferences.warn_large_file => {
                warnings.push(format!(
                    "Large file ({} MB): processing time and token usage will be high. \
                     Uploading it to object storage and analyzing by URL saves roughly 30-40%",
                    size
                ));
            }
            Strategy::UploadRecommend => {
                let oversize = ValidationError::Oversize {
                    size_mb: size,
                    max_mb: self
                        .thresholds
                        .large_file_mb
                        .min(self.preferences.max_file_size_mb),
                };
                warnings.push(format!("{}; it cannot be submitted inline", oversize));
                recommendations.extend([
                    "1. Upload the video to object storage (S3, OSS, COS, ...)".to_string(),
                    "2. Obtain a public URL for the video".to_string(),
                    "3. Analyze it by URL (recommended)".to_string(),
                ]);
            }
            _ => {}
        }

        let plan = self.estimator.plan(strategy, analysis.file_size_mb);

        RoutingDecision {
            analysis,
            strategy: Some(strategy),
            plan: Some(plan),
            warnings,
            recommendations,
        }
    }
}

fn truncate(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        format!("{}...", input.chars().take(max_chars).collect::<String>())
    }
}
