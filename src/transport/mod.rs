pub mod http;
#[cfg(test)]
pub mod mock;

use crate::routing::Strategy;
use crate::utils::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

pub use http::HttpTransport;

/// What a staged request asks the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Video(Strategy),
    Image,
    Text,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video(strategy) => write!(f, "{}", strategy),
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A request document already written to the scratch space, plus where and
/// how to send it.
#[derive(Clone)]
pub struct StagedRequest {
    pub kind: RequestKind,
    pub document: PathBuf,
    pub endpoint: String,
    pub api_key: String,
}

impl fmt::Debug for StagedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedRequest")
            .field("kind", &self.kind)
            .field("document", &self.document)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// One request/response exchange with the chat-completion endpoint.
///
/// Implementations return the raw response body of a successful call and map
/// connection failures and non-2xx statuses to `Error::Transport`. Deadlines
/// are enforced by the caller.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &StagedRequest) -> Result<String>;
}
