use crate::routing::Strategy;
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Successful chat-completion envelope. Fields the formatter does not use
/// are kept so `--json` output matches what the API returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tried_strategies: Option<Vec<Strategy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

/// Outcome of one analysis request, in the JSON shape shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Success(ChatCompletion),
    Raw { result: String },
    Failure(FailureReport),
}

impl AnalysisResult {
    pub fn failure<T: Into<String>>(error: T) -> Self {
        Self::Failure(FailureReport {
            error: error.into(),
            tried_strategies: None,
            recommendations: None,
        })
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Success(completion) => completion
                .choices
                .first()
                .and_then(|c| c.message.content.as_deref()),
            Self::Raw { result } => Some(result),
            Self::Failure(_) => None,
        }
    }
}

/// Interprets the body of a 2xx response.
///
/// A top-level `error` member is an API failure. Anything that is not the
/// completion envelope is passed through as raw text.
pub fn parse_response(body: &str) -> Result<AnalysisResult> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return Ok(AnalysisResult::Raw {
                result: body.to_string(),
            })
        }
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
            .unwrap_or_else(|| error.to_string());
        return Err(Error::api(message));
    }

    match serde_json::from_value::<ChatCompletion>(value) {
        Ok(completion) if !completion.choices.is_empty() => Ok(AnalysisResult::Success(completion)),
        _ => Ok(AnalysisResult::Raw {
            result: body.to_string(),
        }),
    }
}
