pub mod request;
pub mod response;
pub mod scratch;

pub use request::{
    video_data_uri, ChatRequest, ChatTurn, ContentPart, MediaUrl, MessageContent,
    VIDEO_DATA_URI_PREFIX,
};
pub use response::{parse_response, AnalysisResult, AssistantMessage, ChatCompletion, FailureReport, Usage};
pub use scratch::ScratchSpace;

use crate::config::{ConfigStore, DEFAULT_TEXT_MODEL};
use crate::routing::{is_url, Strategy};
use crate::transport::{ChatTransport, RequestKind, StagedRequest};
use crate::utils::{format_file_size, Error, Result};
use base64::{engine::general_purpose, Engine as _};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const REQUEST_DOCUMENT: &str = "request.json";
const PAYLOAD_DOCUMENT: &str = "video.b64";

/// Everything needed to authenticate a call, resolved from the config store.
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl ApiCredentials {
    /// Fails with a configuration error when the key is absent or implausible.
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        Ok(Self {
            api_key: store.api_key()?,
            model: store.model_name()?,
            endpoint: store.base_url()?,
        })
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Deadline for a whole call, from reading the input to the response body.
///
/// `url` also bounds image and text requests, which never read local files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimeouts {
    pub url: Duration,
    pub file: Duration,
}

impl Default for CallTimeouts {
    fn default() -> Self {
        Self {
            url: Duration::from_secs(300),
            file: Duration::from_secs(600),
        }
    }
}

impl CallTimeouts {
    pub fn for_strategy(&self, strategy: Strategy) -> Duration {
        if strategy.is_inline() {
            self.file
        } else {
            self.url
        }
    }
}

/// How the video reference is put into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestHandler {
    /// The input is already a URL the API can fetch
    UrlReference,
    /// The file is read, base64 encoded and sent as a data URI
    InlineBase64,
}

impl RequestHandler {
    fn for_strategy(strategy: Strategy) -> Option<Self> {
        match strategy {
            Strategy::UrlDirect => Some(Self::UrlReference),
            Strategy::Base64Small | Strategy::Base64Large => Some(Self::InlineBase64),
            Strategy::UploadRecommend => None,
        }
    }

    async fn video_url(&self, input: &str, scratch: &mut ScratchSpace) -> Result<String> {
        match self {
            Self::UrlReference => Ok(input.to_string()),
            Self::InlineBase64 => {
                let bytes = tokio::fs::read(input).await.map_err(|e| {
                    Error::validation(format!("cannot read video file {}: {}", input, e))
                })?;
                debug!("Encoding {} as base64", format_file_size(bytes.len() as u64));

                let encoded_len = base64::encoded_len(bytes.len(), true).unwrap_or(0);
                let mut data_uri = String::with_capacity(VIDEO_DATA_URI_PREFIX.len() + encoded_len);
                data_uri.push_str(VIDEO_DATA_URI_PREFIX);
                general_purpose::STANDARD.encode_string(&bytes, &mut data_uri);
                drop(bytes);

                // Diagnostics only: nothing reads the payload back, the request
                // document carries its own copy
                let payload = &data_uri[VIDEO_DATA_URI_PREFIX.len()..];
                scratch.stage(PAYLOAD_DOCUMENT, payload.as_bytes()).await?;
                Ok(data_uri)
            }
        }
    }
}

fn is_image_reference(input: &str) -> bool {
    is_url(input) || input.starts_with("data:image/")
}

/// Performs one call against the chat-completion endpoint.
///
/// Each call gets its own scratch directory under `scratch_root`, removed
/// before the call returns or when its future is dropped.
pub struct AnalysisExecutor {
    transport: Arc<dyn ChatTransport>,
    credentials: ApiCredentials,
    scratch_root: PathBuf,
    timeouts: CallTimeouts,
}

impl AnalysisExecutor {
    pub fn new(transport: Arc<dyn ChatTransport>, credentials: ApiCredentials) -> Self {
        Self {
            transport,
            credentials,
            scratch_root: std::env::temp_dir(),
            timeouts: CallTimeouts::default(),
        }
    }

    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.scratch_root = root.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: CallTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn model(&self) -> &str {
        &self.credentials.model
    }

    /// Analyzes a video with one strategy.
    pub async fn execute(
        &self,
        strategy: Strategy,
        input: &str,
        question: &str,
    ) -> Result<AnalysisResult> {
        let handler = RequestHandler::for_strategy(strategy).ok_or_else(|| {
            Error::validation(format!(
                "strategy {} cannot be executed; upload the file and analyze it by URL",
                strategy
            ))
        })?;

        let kind = RequestKind::Video(strategy);
        let call = self.video_call(handler, kind, input, question);
        self.with_deadline(kind, self.timeouts.for_strategy(strategy), call)
            .await
    }

    /// Asks a question about an image given by URL or `data:image/...` URI.
    pub async fn describe_image(&self, image_url: &str, question: &str) -> Result<AnalysisResult> {
        let image_url = image_url.trim();
        if !is_image_reference(image_url) {
            return Err(Error::validation(format!(
                "not an image URL or data:image URI: {}",
                image_url
            )));
        }

        let request = ChatRequest::image(&self.credentials.model, image_url, question);
        let call = self.plain_call(RequestKind::Image, request);
        self.with_deadline(RequestKind::Image, self.timeouts.url, call)
            .await
    }

    /// Text-only chat. `model` defaults to [`DEFAULT_TEXT_MODEL`], not the
    /// configured vision model.
    pub async fn generate_text(&self, prompt: &str, model: Option<&str>) -> Result<AnalysisResult> {
        if prompt.trim().is_empty() {
            return Err(Error::validation("prompt is empty"));
        }
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_TEXT_MODEL);

        let request = ChatRequest::text(model, prompt);
        let call = self.plain_call(RequestKind::Text, request);
        self.with_deadline(RequestKind::Text, self.timeouts.url, call)
            .await
    }

    async fn video_call(
        &self,
        handler: RequestHandler,
        kind: RequestKind,
        input: &str,
        question: &str,
    ) -> Result<String> {
        let mut scratch = ScratchSpace::create(&self.scratch_root).await?;
        let video_url = handler.video_url(input, &mut scratch).await?;
        let request = ChatRequest::video(&self.credentials.model, video_url, question);
        self.send(kind, request, &mut scratch).await
    }

    async fn plain_call(&self, kind: RequestKind, request: ChatRequest) -> Result<String> {
        let mut scratch = ScratchSpace::create(&self.scratch_root).await?;
        self.send(kind, request, &mut scratch).await
    }

    async fn send(
        &self,
        kind: RequestKind,
        request: ChatRequest,
        scratch: &mut ScratchSpace,
    ) -> Result<String> {
        let document = serde_json::to_vec(&request)?;
        debug!("Request for model {}", request.model);
        drop(request);
        let document = scratch.stage(REQUEST_DOCUMENT, &document).await?;

        let staged = StagedRequest {
            kind,
            document,
            endpoint: self.credentials.endpoint.clone(),
            api_key: self.credentials.api_key.clone(),
        };
        self.transport.send(&staged).await
    }

    async fn with_deadline<F>(
        &self,
        kind: RequestKind,
        timeout: Duration,
        call: F,
    ) -> Result<AnalysisResult>
    where
        F: Future<Output = Result<String>>,
    {
        info!("Sending {} request (timeout {}s)", kind, timeout.as_secs());
        let started = Instant::now();

        let body = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| Error::Timeout {
                seconds: timeout.as_secs(),
            })??;

        debug!(
            "Received response ({} bytes) in {:.1}s",
            body.len(),
            started.elapsed().as_secs_f64()
        );

        parse_response(&body)
    }
}
