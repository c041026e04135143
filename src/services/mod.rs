// src/services/mod.rs
pub mod chat_proxy;
pub mod gate;
pub mod openrouter;
pub mod profile;
pub mod prompt;
