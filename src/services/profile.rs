// src/services/profile.rs
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

/// Read the owner's resume/profile JSON once.
///
/// A missing or malformed file is logged and yields `None`; the chat proxy
/// then embeds `null` as its resume data instead of refusing to start.
pub async fn load_profile(path: impl AsRef<Path>) -> Option<Value> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading profile data");

    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "profile data unavailable");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "profile data is not valid JSON");
            None
        }
    }
}
