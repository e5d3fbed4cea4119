//! Text-generation backend clients for the Vasari content pipeline.
//!
//! Currently provides an OpenAI chat-completions client. Backends implement
//! [`vasari_interface::TextGenerator`] and are injected into the pipeline,
//! never reached through global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{OpenAiClient, DEFAULT_MODEL};
