// src/config.rs
//! Runtime configuration, read from the environment (and `.env`) at startup.

use std::{fmt::Debug, path::PathBuf, time::Duration};

use crate::{error::AppError, services::prompt::PersonaLinks};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default `0.0.0.0:3000`).
    pub bind_address: String,
    /// Bearer token for the chat-completion API. No default.
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer` on every upstream call.
    pub site_url: String,
    pub profile_path: PathBuf,
    /// Directory served for any path without a route.
    pub static_dir: PathBuf,
    pub max_concurrency: usize,
    pub upstream_timeout: Duration,
    /// `tracing` level, e.g. `info` or `debug`.
    pub log_level: String,
    pub links: PersonaLinks,
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("site_url", &self.site_url)
            .field("profile_path", &self.profile_path)
            .field("static_dir", &self.static_dir)
            .field("max_concurrency", &self.max_concurrency)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let parse = |key: &str, default: u64| -> Result<u64, AppError> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Config(format!("{key} must be a positive integer, got {v:?}"))),
                None => Ok(default),
            }
        };

        let api_key = lookup("OPENROUTER_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("OPENROUTER_API_KEY is not set".to_string()))?;

        let max_concurrency = parse("PORTFOLIO_MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY as u64)? as usize;
        if max_concurrency == 0 {
            return Err(AppError::Config("PORTFOLIO_MAX_CONCURRENCY must be at least 1".to_string()));
        }

        let upstream_timeout_secs = parse("PORTFOLIO_UPSTREAM_TIMEOUT_SECS", 60)?;
        if upstream_timeout_secs == 0 {
            return Err(AppError::Config(
                "PORTFOLIO_UPSTREAM_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_address: get("PORTFOLIO_BIND", "0.0.0.0:3000"),
            api_key,
            api_url: get("OPENROUTER_API_URL", DEFAULT_API_URL),
            model: get("OPENROUTER_MODEL", DEFAULT_MODEL),
            site_url: get("PORTFOLIO_SITE_URL", "http://localhost:3000"),
            profile_path: get("PORTFOLIO_PROFILE_PATH", "src/data/resumeData.json").into(),
            static_dir: get("PORTFOLIO_STATIC_DIR", "public").into(),
            max_concurrency,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            log_level: get("PORTFOLIO_LOG", "info"),
            links: PersonaLinks {
                projects: get("PORTFOLIO_PROJECTS_PATH", "/projects"),
                github: get("PORTFOLIO_GITHUB_URL", "https://github.com/SaiRamReddySolleti"),
                linkedin: get(
                    "PORTFOLIO_LINKEDIN_URL",
                    "https://www.linkedin.com/in/sai-ram-reddy-solleti-17b881247/",
                ),
            },
        })
    }
}
