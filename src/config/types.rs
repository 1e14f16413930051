use crate::routing::{DefaultStrategy, Strategy};
use crate::utils::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MODEL: &str = "glm-4.6v";
/// Used by text chat when no model is given.
pub const DEFAULT_TEXT_MODEL: &str = "glm-4";
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

/// Keys shorter than this are treated as not configured.
pub const MIN_API_KEY_LEN: usize = 10;
const PLACEHOLDER_KEY_PREFIX: &str = "your-api-key";

/// Credential document: `{"env": {"Z_AI_API_KEY": ..., "Z_AI_MODE": ...}}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Option<ApiEnv>,
}

#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiEnv {
    #[serde(rename = "Z_AI_API_KEY", default)]
    pub api_key: Option<String>,

    #[serde(rename = "Z_AI_MODE", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(rename = "Z_AI_BASE_URL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ApiEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEnv")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiConfig {
    /// The API key, rejecting absent, short and placeholder values.
    pub fn validated_key(&self, path: &str) -> Result<&str> {
        let env = self.env.as_ref().ok_or_else(|| ConfigError::MissingKey {
            path: path.to_string(),
            key: "env".to_string(),
        })?;

        let key = env
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                path: path.to_string(),
                key: "Z_AI_API_KEY".to_string(),
            })?;

        if key.len() < MIN_API_KEY_LEN || key.starts_with(PLACEHOLDER_KEY_PREFIX) {
            return Err(ConfigError::InvalidKey {
                path: path.to_string(),
            }
            .into());
        }

        Ok(key)
    }

    pub fn model(&self) -> &str {
        self.env
            .as_ref()
            .and_then(|e| e.model.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.env
            .as_ref()
            .and_then(|e| e.base_url.as_deref())
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

/// `abcdefgh...wxyz` for display; short keys are never shown.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "not configured".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// User preferences; every key is optional on disk and merged over defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub default_strategy: DefaultStrategy,
    pub auto_fallback: bool,
    pub max_file_size_mb: f64,
    pub warn_large_file: bool,
    pub prefer_url: bool,
    pub strategy_order: Vec<Strategy>,
    /// Overrides the built-in downgrade table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_table: Option<BTreeMap<Strategy, Vec<Strategy>>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_strategy: DefaultStrategy::Auto,
            auto_fallback: true,
            max_file_size_mb: 100.0,
            warn_large_file: true,
            prefer_url: true,
            strategy_order: vec![
                Strategy::UrlDirect,
                Strategy::Base64Small,
                Strategy::Base64Large,
            ],
            fallback_table: None,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<()> {
        if !self.max_file_size_mb.is_finite() || self.max_file_size_mb <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "max_file_size_mb".to_string(),
                reason: format!("must be a positive number, got {}", self.max_file_size_mb),
            }
            .into());
        }

        if let Some(table) = &self.fallback_table {
            for (from, candidates) in table {
                if candidates.contains(from) {
                    return Err(ConfigError::InvalidValue {
                        key: "fallback_table".to_string(),
                        reason: format!("'{}' lists itself as a fallback", from),
                    }
                    .into());
                }
                if candidates.contains(&Strategy::UploadRecommend) {
                    return Err(ConfigError::InvalidValue {
                        key: "fallback_table".to_string(),
                        reason: "upload_recommend cannot be a fallback candidate".to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Sets one preference from its textual CLI form.
    pub fn set_from_str(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        };

        match key {
            "default_strategy" => {
                self.default_strategy = value.parse().map_err(invalid)?;
            }
            "auto_fallback" => self.auto_fallback = parse_bool(value).map_err(invalid)?,
            "warn_large_file" => self.warn_large_file = parse_bool(value).map_err(invalid)?,
            "prefer_url" => self.prefer_url = parse_bool(value).map_err(invalid)?,
            "max_file_size_mb" => {
                self.max_file_size_mb = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            "strategy_order" => {
                self.strategy_order = value
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(str::parse::<Strategy>)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(invalid)?;
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("unknown preference (valid: {})", SETTABLE_KEYS.join(", ")),
                }
                .into())
            }
        }

        self.validate()
    }
}

pub const SETTABLE_KEYS: &[&str] = &[
    "default_strategy",
    "auto_fallback",
    "max_file_size_mb",
    "warn_large_file",
    "prefer_url",
    "strategy_order",
];

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true/false, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_env_debug_masks_key() {
        let env = ApiEnv {
            api_key: Some("sk-live-0123456789abcdef".to_string()),
            model: None,
            base_url: None,
        };
        let debug = format!("{:?}", ApiConfig { env: Some(env) });
        assert!(!debug.contains("sk-live-0123456789abcdef"));
        assert!(debug.contains("sk-live-...cdef"));
    }

    #[test]
    fn test_partial_preferences_merge_over_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"default_strategy": "url_first", "max_file_size_mb": 50}"#)
                .unwrap();

        assert_eq!(prefs.default_strategy, DefaultStrategy::UrlFirst);
        assert_eq!(prefs.max_file_size_mb, 50.0);
        assert!(prefs.auto_fallback);
        assert_eq!(prefs.strategy_order, Preferences::default().strategy_order);
        assert_eq!(prefs.fallback_table, None);
    }

    #[test]
    fn test_default_preferences_document() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "default_strategy": "auto",
                "auto_fallback": true,
                "max_file_size_mb": 100.0,
                "warn_large_file": true,
                "prefer_url": true,
                "strategy_order": ["url_direct", "base64_small", "base64_large"]
            })
        );
    }

    #[test]
    fn test_fallback_table_from_json() {
        let prefs: Preferences = serde_json::from_str(
            r#"{"fallback_table": {"base64_large": [], "url_direct": ["base64_small"]}}"#,
        )
        .unwrap();
        let table = prefs.fallback_table.unwrap();
        assert_eq!(table[&Strategy::Base64Large], Vec::<Strategy>::new());
        assert_eq!(table[&Strategy::UrlDirect], vec![Strategy::Base64Small]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut prefs = Preferences::default();
        prefs.max_file_size_mb = 0.0;
        assert!(prefs.validate().is_err());

        let mut prefs = Preferences::default();
        let mut table = BTreeMap::new();
        table.insert(Strategy::Base64Small, vec![Strategy::Base64Small]);
        prefs.fallback_table = Some(table);
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_set_from_str() {
        let mut prefs = Preferences::default();
        prefs.set_from_str("auto_fallback", "false").unwrap();
        prefs.set_from_str("max_file_size_mb", "42.5").unwrap();
        prefs.set_from_str("strategy_order", "base64_small,url_direct").unwrap();

        assert!(!prefs.auto_fallback);
        assert_eq!(prefs.max_file_size_mb, 42.5);
        assert_eq!(
            prefs.strategy_order,
            vec![Strategy::Base64Small, Strategy::UrlDirect]
        );

        assert!(prefs.set_from_str("auto_fallback", "maybe").is_err());
        assert!(prefs.set_from_str("colour", "blue").is_err());
        assert!(prefs.set_from_str("max_file_size_mb", "-1").is_err());
    }

    #[test]
    fn test_validated_key() {
        let config = |key: Option<&str>| ApiConfig {
            env: Some(ApiEnv {
                api_key: key.map(String::from),
                ..ApiEnv::default()
            }),
        };

        assert_eq!(
            config(Some("sk-0123456789abcdef")).validated_key("api_config.json").unwrap(),
            "sk-0123456789abcdef"
        );
        assert!(config(Some("short")).validated_key("p").is_err());
        assert!(config(Some("your-api-key-here-please")).validated_key("p").is_err());
        assert!(config(None).validated_key("p").is_err());
        assert!(ApiConfig { env: None }.validated_key("p").is_err());
    }

    #[test]
    fn test_model_and_base_url_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"env": {"Z_AI_API_KEY": "sk-0123456789"}}"#).unwrap();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);

        let config: ApiConfig = serde_json::from_str(
            r#"{"env": {"Z_AI_API_KEY": "sk-0123456789", "Z_AI_MODE": "glm-4.5v"}}"#,
        )
        .unwrap();
        assert_eq!(config.model(), "glm-4.5v");
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-abcdefghijklmnop"), "sk-abcde...mnop");
        assert_eq!(mask_api_key("short"), "not configured");
    }
}
