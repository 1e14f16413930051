use super::{ChatTransport, StagedRequest};
use crate::utils::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

const USER_AGENT: &str = concat!("zai-video/", env!("CARGO_PKG_VERSION"));

/// Sends staged request documents over HTTPS with bearer authentication.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &StagedRequest) -> Result<String> {
        let body = tokio::fs::read(&request.document).await?;
        debug!(
            "POST {} ({} byte request body)",
            request.endpoint,
            body.len()
        );

        let response = self
            .client
            .post(&request.endpoint)
            .bearer_auth(&request.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = text.trim();
            return Err(Error::transport(if detail.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, detail)
            }));
        }

        Ok(text)
    }
}
