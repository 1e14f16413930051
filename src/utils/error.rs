use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    MissingFile { path: String },

    #[error("Malformed configuration file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Missing required key '{key}' in {path}")]
    MissingKey { path: String, key: String },

    #[error("API key in {path} looks invalid (placeholder or too short)")]
    InvalidKey { path: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("API error: {message}")]
    Api { message: String },

    /// The attempt history lives on `FallbackOutcome::tried`
    #[error("all strategies failed")]
    Exhausted,

    #[error("Logging setup error: {0}")]
    Logging(String),
}

impl Error {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn api<T: Into<String>>(message: T) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Only failures of the call itself qualify for a strategy downgrade.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Api { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
