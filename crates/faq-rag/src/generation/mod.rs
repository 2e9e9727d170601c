//! Answer generation: prompt rendering and the generation backend client

pub mod client;
pub mod prompt;

pub use client::{ChatCompletionsClient, GenerationClient};
pub use prompt::{PromptBuilder, NO_CONTEXT_SENTINEL, SYSTEM_MESSAGE};
