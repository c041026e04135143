// src/services/chat_proxy.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::{
    gate::ConcurrencyGate,
    openrouter::OpenRouterClient,
    prompt::{PersonaLinks, build_system_prompt},
};
use crate::{
    error::AppError,
    message::{ChatCompletionRequest, ChatCompletionResponse, ConversationHistory, MessageRole},
};

pub const UPSTREAM_UNAVAILABLE: &str = "Error: Unable to get response from the API";
pub const INVALID_UPSTREAM_RESPONSE: &str = "Error: Invalid API response";

/// Answers visitor questions as the site owner by forwarding them, with the
/// resume prompt, to the chat-completion API.
#[derive(Clone, Debug)]
pub struct ChatProxy {
    gate: ConcurrencyGate,
    client: OpenRouterClient,
    model: String,
    links: PersonaLinks,
    profile: Option<Arc<Value>>,
}

impl ChatProxy {
    pub fn new(
        gate: ConcurrencyGate,
        client: OpenRouterClient,
        model: impl Into<String>,
        links: PersonaLinks,
        profile: Option<Arc<Value>>,
    ) -> Self {
        Self { gate, client, model: model.into(), links, profile }
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// One upstream round trip for `user_input`.
    ///
    /// Upstream trouble comes back as `Ok` with one of the two generic
    /// error strings; only failures building the request are `Err`.
    pub async fn handle(&self, user_input: &str) -> Result<String, AppError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("chat", %request_id, model = %self.model);
        self.complete(user_input).instrument(span).await
    }

    async fn complete(&self, user_input: &str) -> Result<String, AppError> {
        // Held until return, whichever path that is.
        let _permit = self.gate.permit().await?;
        info!(in_flight = self.gate.in_flight(), "processing chat request");

        let mut history = ConversationHistory::new();
        history.push(MessageRole::User, user_input);
        debug_assert!(history.has_user_turn());

        let system_prompt = build_system_prompt(&self.links, self.profile.as_deref())?;
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: history.with_system(system_prompt),
        };

        let reply = match self.client.send(&request).await? {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, url = %self.client.api_url(), "chat completion request failed");
                return Ok(UPSTREAM_UNAVAILABLE.to_string());
            }
        };

        if !reply.status.is_success() {
            error!(status = %reply.status, "chat completion returned an error status");
            return Ok(UPSTREAM_UNAVAILABLE.to_string());
        }

        match serde_json::from_str::<ChatCompletionResponse>(&reply.body)
            .ok()
            .and_then(ChatCompletionResponse::into_first_content)
        {
            Some(content) => {
                info!(chars = content.len(), "assistant reply ready");
                Ok(content)
            }
            None => {
                error!("chat completion response has no usable choices");
                Ok(INVALID_UPSTREAM_RESPONSE.to_string())
            }
        }
    }
}
