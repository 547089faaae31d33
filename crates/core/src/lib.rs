//! Core domain types, prompt building, outline parsing, and the
//! chat-completion client for the startup co-founder agent.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod outline;
pub mod prompts;
pub mod types;

pub use client::{CompletionClient, CompletionRequest, Message, Role};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use generator::Generator;
pub use openai::OpenAiClient;
pub use prompts::{build_prompt, normalize_idea, Deliverable};
pub use types::{Outline, SlideRecord, UnmatchedLine, FALLBACK_TITLE};
