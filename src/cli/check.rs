use crate::config::{ConfigStore, API_CONFIG_FILE, PREFERENCES_FILE};
use crate::utils::filesystem::find_leftover_scratch;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Warn => "!",
            Self::Fail => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckItem {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckItem {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            detail: detail.into(),
        }
    }

    fn warn(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warn,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EnvironmentReport {
    pub items: Vec<CheckItem>,
}

impl EnvironmentReport {
    /// Warnings never fail the check.
    pub fn passed(&self) -> bool {
        self.items.iter().all(|i| i.status != CheckStatus::Fail)
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["Environment check:".to_string(), format!("{:-<60}", "")];
        for item in &self.items {
            lines.push(format!(
                "{} {:<20} {}",
                item.status.symbol(),
                item.name,
                item.detail
            ));
        }
        lines.push(format!("{:-<60}", ""));
        lines.push(if self.passed() {
            "Environment is ready".to_string()
        } else {
            "Environment has problems; fix the items marked ✗".to_string()
        });
        lines.join("\n")
    }
}

/// Checks the configuration directory, both documents and the scratch root.
///
/// `store` carries the error text when the preferences document could not
/// be opened; it is then reported as a failed item.
pub fn check_environment(
    config_dir: &Path,
    store: Result<&ConfigStore, String>,
    scratch_root: &Path,
) -> EnvironmentReport {
    let mut report = EnvironmentReport::default();

    report.items.push(if config_dir.is_dir() {
        if is_writable(config_dir) {
            CheckItem::pass("config directory", config_dir.display().to_string())
        } else {
            CheckItem::fail(
                "config directory",
                format!("{} is not writable", config_dir.display()),
            )
        }
    } else {
        CheckItem::fail(
            "config directory",
            format!("{} does not exist", config_dir.display()),
        )
    });

    match store {
        Ok(store) => {
            report
                .items
                .push(CheckItem::pass("preferences", PREFERENCES_FILE.to_string()));
            report.items.push(match store.api_key() {
                Ok(_) => CheckItem::pass(
                    "api credentials",
                    format!("{} ({})", API_CONFIG_FILE, store.info().api_key_masked),
                ),
                Err(e) => CheckItem::fail("api credentials", e.to_string()),
            });
            if let Ok(model) = store.model_name() {
                report.items.push(CheckItem::pass("model", model));
            }
        }
        Err(e) => report.items.push(CheckItem::fail("preferences", e)),
    }

    report.items.push(if is_writable(scratch_root) {
        CheckItem::pass("scratch directory", scratch_root.display().to_string())
    } else {
        CheckItem::fail(
            "scratch directory",
            format!("{} is not writable", scratch_root.display()),
        )
    });

    match find_leftover_scratch(scratch_root) {
        Ok(leftovers) if leftovers.is_empty() => {}
        Ok(leftovers) => report.items.push(CheckItem::warn(
            "leftover scratch",
            format!(
                "{} directories from interrupted runs: {}",
                leftovers.len(),
                display_paths(&leftovers)
            ),
        )),
        Err(e) => report.items.push(CheckItem::warn("leftover scratch", e.to_string())),
    }

    report
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(format!(".zai-video-check-{}", Uuid::new_v4()));
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
