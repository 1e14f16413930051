use super::strategy::Strategy;
use serde::Serialize;
use std::fmt;

/// Inclusive low-high range shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimateRange {
    pub low: u64,
    pub high: u64,
}

impl fmt::Display for EstimateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            group_thousands(self.low),
            group_thousands(self.high)
        )
    }
}

/// `base + per_mb * size` for each end of a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEstimate {
    pub base_low: f64,
    pub per_mb_low: f64,
    pub base_high: f64,
    pub per_mb_high: f64,
}

impl LinearEstimate {
    pub const fn fixed(low: f64, high: f64) -> Self {
        Self {
            base_low: low,
            per_mb_low: 0.0,
            base_high: high,
            per_mb_high: 0.0,
        }
    }

    pub fn at(&self, size_mb: f64) -> EstimateRange {
        EstimateRange {
            low: (self.base_low + self.per_mb_low * size_mb) as u64,
            high: (self.base_high + self.per_mb_high * size_mb) as u64,
        }
    }
}

/// Cosmetic time/token estimates per strategy. Never used for control flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanEstimator {
    pub url_seconds: LinearEstimate,
    pub url_tokens: LinearEstimate,
    pub small_seconds: LinearEstimate,
    pub small_tokens: LinearEstimate,
    pub large_seconds: LinearEstimate,
    pub large_tokens: LinearEstimate,
}

impl Default for PlanEstimator {
    fn default() -> Self {
        Self {
            url_seconds: LinearEstimate::fixed(20.0, 30.0),
            url_tokens: LinearEstimate::fixed(35_000.0, 45_000.0),
            small_seconds: LinearEstimate {
                base_low: 20.0,
                per_mb_low: 2.0,
                base_high: 30.0,
                per_mb_high: 3.0,
            },
            small_tokens: LinearEstimate {
                base_low: 40_000.0,
                per_mb_low: 2_000.0,
                base_high: 55_000.0,
                per_mb_high: 3_000.0,
            },
            large_seconds: LinearEstimate {
                base_low: 30.0,
                per_mb_low: 3.0,
                base_high: 50.0,
                per_mb_high: 5.0,
            },
            large_tokens: LinearEstimate {
                base_low: 50_000.0,
                per_mb_low: 3_000.0,
                base_high: 80_000.0,
                per_mb_high: 5_000.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPlan {
    pub strategy: Strategy,
    pub method_name: &'static str,
    pub estimated_time_range: Option<EstimateRange>,
    pub estimated_token_range: Option<EstimateRange>,
    pub temp_artifact_count: usize,
}

impl PlanEstimator {
    pub fn plan(&self, strategy: Strategy, size_mb: Option<f64>) -> ExecutionPlan {
        let size_mb = size_mb.unwrap_or(0.0);

        let estimates = match strategy {
            Strategy::UrlDirect => Some((self.url_seconds, self.url_tokens)),
            Strategy::Base64Small => Some((self.small_seconds, self.small_tokens)),
            Strategy::Base64Large => Some((self.large_seconds, self.large_tokens)),
            Strategy::UploadRecommend => None,
        };

        ExecutionPlan {
            strategy,
            method_name: strategy.method_name(),
            estimated_time_range: estimates.map(|(t, _)| t.at(size_mb)),
            estimated_token_range: estimates.map(|(_, k)| k.at(size_mb)),
            temp_artifact_count: strategy.scratch_artifacts(),
        }
    }
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
