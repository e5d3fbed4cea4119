//! OpenAI chat-completions backend.

mod client;
mod types;

pub use client::{OpenAiClient, DEFAULT_MODEL};
