// src/state.rs
use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::Config,
    error::AppError,
    services::{chat_proxy::ChatProxy, gate::ConcurrencyGate, openrouter::OpenRouterClient},
};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub proxy: ChatProxy,
    pub gate: ConcurrencyGate,
    pub profile: Option<Arc<Value>>,
}

impl AppState {
    /// Wire the gate, upstream client and profile together. The gate lives as
    /// long as the state; there is no other instance.
    pub fn new(config: &Config, profile: Option<Value>) -> Result<Self, AppError> {
        let gate = ConcurrencyGate::new(config.max_concurrency);
        let client = OpenRouterClient::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.site_url.clone(),
            config.upstream_timeout,
        )?;
        let profile = profile.map(Arc::new);
        let proxy = ChatProxy::new(
            gate.clone(),
            client,
            config.model.clone(),
            config.links.clone(),
            profile.clone(),
        );

        Ok(Self { proxy, gate, profile })
    }
}
