use super::types::*;
use crate::routing::DefaultStrategy;
use crate::utils::{ConfigError, Result};
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const API_CONFIG_FILE: &str = "api_config.json";
pub const PREFERENCES_FILE: &str = "user_preferences.json";
pub const CONFIG_DIR_ENV: &str = "ZAI_VIDEO_CONFIG_DIR";

/// Credential and preference documents for one process.
///
/// Built once in `main` and handed to the router and executor. Preferences are
/// read at construction; the credential document is read on first use and
/// cached. Every preference mutation is written back immediately.
#[derive(Debug)]
pub struct ConfigStore {
    config_dir: PathBuf,
    preferences: Preferences,
    api_config: OnceCell<ApiConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub config_dir: String,
    pub api_config_path: String,
    pub preferences_path: String,
    pub api_key_masked: String,
    pub model_name: String,
    pub base_url: String,
    pub default_strategy: String,
    pub auto_fallback: bool,
    pub max_file_size_mb: f64,
}

impl ConfigStore {
    /// `--config-dir`, then `$ZAI_VIDEO_CONFIG_DIR`, then the platform config dir.
    pub fn resolve_dir(explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|d| d.join("zai-video"))
            .unwrap_or_else(|| PathBuf::from("config"))
    }

    pub fn open<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&config_dir)?;

        let preferences_path = config_dir.join(PREFERENCES_FILE);
        let preferences = if preferences_path.exists() {
            let prefs = load_json::<Preferences>(&preferences_path)?;
            prefs.validate()?;
            debug!("Preferences loaded from {}", preferences_path.display());
            prefs
        } else {
            let prefs = Preferences::default();
            write_json(&preferences_path, &prefs)?;
            info!("Created default preferences at {}", preferences_path.display());
            prefs
        };

        Ok(Self {
            config_dir,
            preferences,
            api_config: OnceCell::new(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn api_config_path(&self) -> PathBuf {
        self.config_dir.join(API_CONFIG_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILE)
    }

    pub fn api_config(&self) -> Result<&ApiConfig> {
        self.api_config.get_or_try_init(|| {
            let path = self.api_config_path();
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                }
                .into());
            }
            let config = load_json::<ApiConfig>(&path)?;
            debug!("API configuration loaded from {}", path.display());
            Ok(config)
        })
    }

    pub fn api_key(&self) -> Result<String> {
        let path = self.api_config_path().display().to_string();
        Ok(self.api_config()?.validated_key(&path)?.to_string())
    }

    pub fn model_name(&self) -> Result<String> {
        Ok(self.api_config()?.model().to_string())
    }

    pub fn base_url(&self) -> Result<String> {
        Ok(self.api_config()?.base_url().to_string())
    }

    /// Writes a fresh credential document; used by tests and first-run setup.
    pub fn write_api_config(&mut self, config: &ApiConfig) -> Result<()> {
        write_json(&self.api_config_path(), config)?;
        self.api_config = OnceCell::new();
        Ok(())
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_default_strategy(&mut self, strategy: DefaultStrategy) -> Result<()> {
        self.preferences.default_strategy = strategy;
        self.save_preferences()?;
        info!("Default strategy set to {}", strategy);
        Ok(())
    }

    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.preferences.clone();
        updated.set_from_str(key, value)?;
        self.preferences = updated;
        self.save_preferences()?;
        info!("Preference {} set to {}", key, value);
        Ok(())
    }

    pub fn replace_preferences(&mut self, preferences: Preferences) -> Result<()> {
        preferences.validate()?;
        self.preferences = preferences;
        self.save_preferences()
    }

    pub fn reset_preferences(&mut self) -> Result<()> {
        self.preferences = Preferences::default();
        self.save_preferences()?;
        info!("Preferences reset to defaults");
        Ok(())
    }

    fn save_preferences(&self) -> Result<()> {
        write_json(&self.preferences_path(), &self.preferences)
    }

    pub fn info(&self) -> ConfigInfo {
        let (api_key_masked, model_name, base_url) = match self.api_config() {
            Ok(config) => (
                config
                    .env
                    .as_ref()
                    .and_then(|e| e.api_key.as_deref())
                    .map(mask_api_key)
                    .unwrap_or_else(|| "not configured".to_string()),
                config.model().to_string(),
                config.base_url().to_string(),
            ),
            Err(e) => {
                warn!("API configuration unavailable: {}", e);
                (
                    "not configured".to_string(),
                    DEFAULT_MODEL.to_string(),
                    DEFAULT_BASE_URL.to_string(),
                )
            }
        };

        ConfigInfo {
            config_dir: self.config_dir.display().to_string(),
            api_config_path: self.api_config_path().display().to_string(),
            preferences_path: self.preferences_path().display().to_string(),
            api_key_masked,
            model_name,
            base_url,
            default_strategy: self.preferences.default_strategy.to_string(),
            auto_fallback: self.preferences.auto_fallback,
            max_file_size_mb: self.preferences.max_file_size_mb,
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        ConfigError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Strategy;
    use crate::utils::Error;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_api(dir: &Path, body: &str) {
        std::fs::write(dir.join(API_CONFIG_FILE), body).unwrap();
    }

    #[test]
    fn test_open_writes_default_preferences() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path()).unwrap();

        assert_eq!(store.preferences(), &Preferences::default());
        let on_disk: Preferences = load_json(&dir.path().join(PREFERENCES_FILE)).unwrap();
        assert_eq!(on_disk, Preferences::default());
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ConfigStore::open(&nested).unwrap();
        assert!(nested.join(PREFERENCES_FILE).exists());
    }

    #[test]
    fn test_malformed_preferences_is_typed_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREFERENCES_FILE), "{ not json").unwrap();

        let err = ConfigStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_preferences_round_trip() {
        let dir = tempdir().unwrap();
        {
            let mut store = ConfigStore::open(dir.path()).unwrap();
            store.set_default_strategy(DefaultStrategy::Base64Only).unwrap();
            store.set_preference("auto_fallback", "false").unwrap();
            store.set_preference("max_file_size_mb", "50").unwrap();
            store.set_preference("warn_large_file", "no").unwrap();
            store.set_preference("prefer_url", "off").unwrap();
            store
                .set_preference("strategy_order", "base64_small,base64_large")
                .unwrap();
        }

        let reloaded = ConfigStore::open(dir.path()).unwrap();
        let prefs = reloaded.preferences();
        assert_eq!(prefs.default_strategy, DefaultStrategy::Base64Only);
        assert!(!prefs.auto_fallback);
        assert_eq!(prefs.max_file_size_mb, 50.0);
        assert!(!prefs.warn_large_file);
        assert!(!prefs.prefer_url);
        assert_eq!(
            prefs.strategy_order,
            vec![Strategy::Base64Small, Strategy::Base64Large]
        );
    }

    #[test]
    fn test_rejected_preference_is_not_persisted() {
        let dir = tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path()).unwrap();

        assert!(store.set_preference("max_file_size_mb", "-5").is_err());
        assert_eq!(store.preferences().max_file_size_mb, 100.0);

        let reloaded = ConfigStore::open(dir.path()).unwrap();
        assert_eq!(reloaded.preferences().max_file_size_mb, 100.0);
    }

    #[test]
    fn test_reset_preferences() {
        let dir = tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path()).unwrap();
        store.set_preference("auto_fallback", "false").unwrap();
        store.reset_preferences().unwrap();

        let reloaded = ConfigStore::open(dir.path()).unwrap();
        assert_eq!(reloaded.preferences(), &Preferences::default());
    }

    #[test]
    fn test_api_config_missing_file() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path()).unwrap();

        let err = store.api_key().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn test_api_config_malformed_and_missing_key_are_distinct() {
        let dir = tempdir().unwrap();
        write_api(dir.path(), "{\"env\": ");
        let store = ConfigStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.api_key().unwrap_err(),
            Error::Config(ConfigError::Malformed { .. })
        ));

        let dir = tempdir().unwrap();
        write_api(dir.path(), r#"{"env": {"Z_AI_MODE": "glm-4.6v"}}"#);
        let store = ConfigStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.api_key().unwrap_err(),
            Error::Config(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_api_key_and_model() {
        let dir = tempdir().unwrap();
        write_api(
            dir.path(),
            r#"{"env": {"Z_AI_API_KEY": "sk-test-0123456789", "Z_AI_MODE": "glm-4.5v"}}"#,
        );
        let store = ConfigStore::open(dir.path()).unwrap();

        assert_eq!(store.api_key().unwrap(), "sk-test-0123456789");
        assert_eq!(store.model_name().unwrap(), "glm-4.5v");
        assert_eq!(store.base_url().unwrap(), DEFAULT_BASE_URL);

        let info = store.info();
        assert_eq!(info.api_key_masked, "sk-test-...6789");
        assert_eq!(info.default_strategy, "auto");

        // The cached credential document shows up in Debug output masked
        let debug = format!("{:?}", store);
        assert!(debug.contains("sk-test-...6789"));
        assert!(!debug.contains("sk-test-0123456789"));
    }

    #[test]
    fn test_write_api_config_invalidates_cache() {
        let dir = tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path()).unwrap();
        assert!(store.api_key().is_err());

        store
            .write_api_config(&ApiConfig {
                env: Some(ApiEnv {
                    api_key: Some("sk-live-abcdefghij".to_string()),
                    ..ApiEnv::default()
                }),
            })
            .unwrap();
        assert_eq!(store.api_key().unwrap(), "sk-live-abcdefghij");
    }

    #[test]
    fn test_resolve_dir_prefers_explicit() {
        let explicit = Path::new("/opt/zai");
        assert_eq!(ConfigStore::resolve_dir(Some(explicit)), explicit.to_path_buf());
    }
}
