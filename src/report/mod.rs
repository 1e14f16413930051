//! Text rendering of routing decisions and analysis results for the terminal.

use crate::executor::{AnalysisResult, ChatCompletion, FailureReport};
use crate::routing::{group_thousands, RoutingDecision, RoutingThresholds, Strategy};
use console::Style;

const RULE_WIDTH: usize = 60;

pub struct ReportFormatter {
    colored: bool,
}

impl ReportFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colored)
    }

    fn heading(&self, title: &str) -> Vec<String> {
        let rule = "=".repeat(RULE_WIDTH);
        vec![
            rule.clone(),
            self.style(Style::new().bold()).apply_to(title).to_string(),
            rule,
        ]
    }

    pub fn format_result(&self, result: &AnalysisResult) -> String {
        match result {
            AnalysisResult::Success(completion) => self.format_success(completion),
            AnalysisResult::Raw { result } => result.clone(),
            AnalysisResult::Failure(failure) => self.format_failure(failure),
        }
    }

    pub fn format_success(&self, completion: &ChatCompletion) -> String {
        let mut lines = self.heading("Analysis result");
        lines.push(String::new());

        if let Some(message) = completion.choices.first().map(|c| &c.message) {
            let section = self.style(Style::new().cyan().bold());
            if let Some(reasoning) = message.reasoning_content.as_deref().filter(|r| !r.is_empty()) {
                lines.push(section.apply_to("### Reasoning").to_string());
                lines.push(reasoning.to_string());
                lines.push(String::new());
            }
            if let Some(content) = message.content.as_deref().filter(|c| !c.is_empty()) {
                lines.push(section.apply_to("### Content").to_string());
                lines.push(content.to_string());
                lines.push(String::new());
            }
        }

        if let Some(usage) = &completion.usage {
            lines.push(String::new());
            lines.extend(self.heading("Usage"));
            lines.push(format!("- Total tokens: {}", group_thousands(usage.total_tokens)));
            lines.push(format!("- Prompt tokens: {}", group_thousands(usage.prompt_tokens)));
            lines.push(format!(
                "- Completion tokens: {}",
                group_thousands(usage.completion_tokens)
            ));
        }

        lines.join("\n")
    }

    pub fn format_failure(&self, failure: &FailureReport) -> String {
        let red = self.style(Style::new().red().bold());
        let mut lines = vec![red
            .apply_to(format!("Analysis failed: {}", failure.error))
            .to_string()];

        if let Some(tried) = failure.tried_strategies.as_ref().filter(|t| !t.is_empty()) {
            let names: Vec<&str> = tried.iter().map(Strategy::as_str).collect();
            lines.push(String::new());
            lines.push(format!("Tried strategies: {}", names.join(", ")));
        }

        if let Some(recommendations) = failure.recommendations.as_ref().filter(|r| !r.is_empty()) {
            lines.push(String::new());
            lines.push("Recommendations:".to_string());
            lines.extend(recommendations.iter().map(|r| format!("  {}", r)));
        }

        lines.join("\n")
    }

    /// Input type, size, strategy, advisories and, optionally, the plan.
    pub fn render_decision(&self, decision: &RoutingDecision, show_plan: bool) -> String {
        let analysis = &decision.analysis;
        let mut lines = vec![format!("Input type: {}", analysis.kind.as_str().to_uppercase())];

        if let Some(size) = analysis.file_size_mb {
            lines.push(format!("File size: {} MB", size));
        }

        let Some(strategy) = decision.strategy else {
            lines.push(
                self.style(Style::new().red())
                    .apply_to(format!(
                        "Invalid input: {}",
                        analysis.error.as_deref().unwrap_or("unknown error")
                    ))
                    .to_string(),
            );
            return lines.join("\n");
        };

        lines.push(
            self.style(Style::new().green().bold())
                .apply_to(format!("Selected strategy: {}", strategy.label()))
                .to_string(),
        );

        if !decision.warnings.is_empty() {
            lines.push(String::new());
            lines.push(self.style(Style::new().yellow()).apply_to("Warnings:").to_string());
            lines.extend(decision.warnings.iter().map(|w| format!("  {}", w)));
        }

        if !decision.recommendations.is_empty() {
            lines.push(String::new());
            lines.push("Recommendations:".to_string());
            lines.extend(decision.recommendations.iter().map(|r| format!("  {}", r)));
        }

        if show_plan && strategy.is_executable() {
            if let Some(plan) = &decision.plan {
                lines.push(String::new());
                lines.push("Execution plan:".to_string());
                lines.push(format!("  Method: {}", plan.method_name));
                if let Some(time) = plan.estimated_time_range {
                    lines.push(format!("  Estimated time: {} s", time));
                }
                if let Some(tokens) = plan.estimated_token_range {
                    lines.push(format!("  Estimated tokens: {}", tokens));
                }
                lines.push(format!("  Temporary files: {}", plan.temp_artifact_count));
            }
        }

        lines.join("\n")
    }

    pub fn render_strategy_comparison(&self, thresholds: &RoutingThresholds) -> String {
        let small = format_mb(thresholds.small_file_mb);
        let large = format_mb(thresholds.large_file_mb);
        let rows = [
            (Strategy::UrlDirect, "hosted video".to_string(), "lowest", "fastest", "1"),
            (Strategy::Base64Small, format!("local file <= {} MB", small), "low", "fast", "2"),
            (
                Strategy::Base64Large,
                format!("local file {}-{} MB", small, large),
                "high",
                "slow",
                "3",
            ),
            (Strategy::UploadRecommend, format!("file > {} MB", large), "n/a", "n/a", "-"),
        ];

        let mut lines = self.heading("Video strategy comparison");
        lines.push(format!(
            "{:<18} {:<24} {:<8} {:<8} {}",
            "Strategy", "Use case", "Tokens", "Speed", "Priority"
        ));
        lines.push("-".repeat(RULE_WIDTH + 6));
        for (strategy, use_case, tokens, speed, priority) in rows {
            lines.push(format!(
                "{:<18} {:<24} {:<8} {:<8} {}",
                strategy.as_str(),
                use_case,
                tokens,
                speed,
                priority
            ));
        }

        lines.push(String::new());
        lines.push("Recommended:".to_string());
        lines.push("  1. Prefer hosted URLs (fewest tokens, fastest)".to_string());
        lines.push(format!("  2. Files up to {} MB can be inlined directly", small));
        lines.push("  3. Upload larger files to object storage and use the URL".to_string());
        lines.push(format!("  4. Files over {} MB must be uploaded first", large));
        lines.push(String::new());
        lines.push("Set the default strategy:".to_string());
        lines.push("  zai-video config set-strategy url_first".to_string());
        lines.push("  zai-video config set-strategy base64_only".to_string());
        lines.push("  zai-video config set-strategy auto".to_string());

        lines.join("\n")
    }
}

fn format_mb(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
