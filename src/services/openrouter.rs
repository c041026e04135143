// src/services/openrouter.rs
use std::{fmt::Debug, time::Duration};

use reqwest::{Client, StatusCode, header};
use tracing::{debug, info};

use crate::{error::AppError, message::ChatCompletionRequest};

/// Status and raw body of one upstream call.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// Client for an OpenRouter-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    api_url: String,
    api_key: String,
    site_url: String,
}

impl Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("site_url", &self.site_url)
            .finish()
    }
}

impl OpenRouterClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        site_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            site_url: site_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Serialize `request` and POST it. Exactly one attempt.
    ///
    /// The outer error is for failures building the request; the inner one is
    /// the transport failing (connect, timeout, body read).
    pub async fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<Result<UpstreamReply, reqwest::Error>, AppError> {
        let body = serde_json::to_vec(request)?;
        let authorization = header::HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| AppError::Internal("API key is not a valid header value".to_string()))?;
        let referer = header::HeaderValue::from_str(&self.site_url)
            .map_err(|_| AppError::Internal("site URL is not a valid header value".to_string()))?;

        info!(
            url = %self.api_url,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );
        debug!(body = %String::from_utf8_lossy(&body), "chat completion payload");

        let sent = self
            .http
            .post(&self.api_url)
            .header(header::AUTHORIZATION, authorization)
            .header("HTTP-Referer", referer)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return Ok(Err(e)),
        };

        let status = response.status();
        Ok(response.text().await.map(|body| {
            info!(status = %status, bytes = body.len(), "chat completion response received");
            debug!(body = %body, "chat completion response body");
            UpstreamReply { status, body }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key() {
        let client = OpenRouterClient::new(
            "http://127.0.0.1:1/v1/chat/completions",
            "sk-or-secret",
            "http://localhost:3000",
            Duration::from_secs(1),
        )
        .unwrap();
        let shown = format!("{client:?}");
        assert!(!shown.contains("sk-or-secret"));
    }

    #[tokio::test]
    async fn newline_in_key_fails_request_construction() {
        let client = OpenRouterClient::new(
            "http://127.0.0.1:1/v1/chat/completions",
            "bad\nkey",
            "http://localhost:3000",
            Duration::from_secs(1),
        )
        .unwrap();
        let request = ChatCompletionRequest { model: "m".into(), messages: vec![] };
        assert!(matches!(client.send(&request).await, Err(AppError::Internal(_))));
    }
}
