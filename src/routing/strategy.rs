use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a video reference is presented to the chat-completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Hosted video passed by URL
    UrlDirect,
    /// Local file inlined as a base64 data URI
    Base64Small,
    /// Same request shape as `Base64Small`, for files between the two thresholds
    Base64Large,
    /// Too large to inline; the caller is told to host it first
    UploadRecommend,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::UrlDirect,
        Strategy::Base64Small,
        Strategy::Base64Large,
        Strategy::UploadRecommend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlDirect => "url_direct",
            Self::Base64Small => "base64_small",
            Self::Base64Large => "base64_large",
            Self::UploadRecommend => "upload_recommend",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "url_direct" => Some(Self::UrlDirect),
            "base64_small" => Some(Self::Base64Small),
            "base64_large" => Some(Self::Base64Large),
            "upload_recommend" => Some(Self::UploadRecommend),
            _ => None,
        }
    }

    /// Human label, e.g. `URL DIRECT`
    pub fn label(&self) -> String {
        self.as_str().to_uppercase().replace('_', " ")
    }

    /// Whether an API call can be made with this strategy at all.
    pub fn is_executable(&self) -> bool {
        !matches!(self, Self::UploadRecommend)
    }

    /// Whether the request inlines the file contents.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Base64Small | Self::Base64Large)
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::UrlDirect => "analyze_video_url",
            Self::Base64Small | Self::Base64Large => "analyze_video_base64",
            Self::UploadRecommend => "manual_upload",
        }
    }

    /// Files staged in the scratch space for one call: the request document,
    /// plus the encoded payload for inline strategies.
    pub fn scratch_artifacts(&self) -> usize {
        match self {
            Self::UrlDirect => 1,
            Self::Base64Small | Self::Base64Large => 2,
            Self::UploadRecommend => 0,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s).ok_or_else(|| {
            format!(
                "unknown strategy '{}' (expected one of: {})",
                s,
                Self::ALL.map(|st| st.as_str()).join(", ")
            )
        })
    }
}

/// User-level preference for how inputs should ideally be supplied.
///
/// Advisory only: it never overrides the strategy derived from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStrategy {
    #[default]
    Auto,
    UrlFirst,
    Base64Only,
}

impl DefaultStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::UrlFirst => "url_first",
            Self::Base64Only => "base64_only",
        }
    }
}

impl fmt::Display for DefaultStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefaultStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "url_first" => Ok(Self::UrlFirst),
            "base64_only" => Ok(Self::Base64Only),
            other => Err(format!(
                "invalid strategy '{}' (valid: auto, url_first, base64_only)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::from_string(strategy.as_str()), Some(strategy));
            assert_eq!(strategy.to_string(), strategy.as_str());
        }
        assert_eq!(Strategy::from_string("BASE64_LARGE"), Some(Strategy::Base64Large));
        assert_eq!(Strategy::from_string("ftp"), None);
    }

    #[test]
    fn test_strategy_serde_uses_snake_case() {
        let json = serde_json::to_string(&Strategy::Base64Small).unwrap();
        assert_eq!(json, "\"base64_small\"");

        let parsed: Strategy = serde_json::from_str("\"upload_recommend\"").unwrap();
        assert_eq!(parsed, Strategy::UploadRecommend);
    }

    #[test]
    fn test_strategy_label() {
        assert_eq!(Strategy::UrlDirect.label(), "URL DIRECT");
        assert_eq!(Strategy::Base64Large.label(), "BASE64 LARGE");
    }

    #[test]
    fn test_executable_strategies() {
        assert!(Strategy::UrlDirect.is_executable());
        assert!(Strategy::Base64Large.is_executable());
        assert!(!Strategy::UploadRecommend.is_executable());
        assert!(Strategy::Base64Small.is_inline());
        assert!(!Strategy::UrlDirect.is_inline());
    }

    #[test]
    fn test_default_strategy_parse() {
        assert_eq!("url_first".parse::<DefaultStrategy>(), Ok(DefaultStrategy::UrlFirst));
        assert_eq!("AUTO".parse::<DefaultStrategy>(), Ok(DefaultStrategy::Auto));
        assert!("fastest".parse::<DefaultStrategy>().is_err());
    }
}
