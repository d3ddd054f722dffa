//! LLM request/response types for Taskr
//!
//! Modelled on the OpenAI Chat Completions API, reduced to what checklist
//! generation needs: one prompt in, streamed text out.

use tracing::debug;

/// A completion request - everything needed for one LLM call
///
/// Checklist generation is a single-turn exchange: one user prompt in,
/// one streamed answer out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Rendered prompt, sent as the only user message
    pub prompt: String,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn user_prompt(prompt: impl Into<String>, max_tokens: u32) -> Self {
        let prompt = prompt.into();
        debug!(prompt_len = prompt.len(), max_tokens, "CompletionRequest::user_prompt: called");
        Self { prompt, max_tokens }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Full text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    /// Map an OpenAI `finish_reason`
    pub fn from_openai(reason: &str) -> Self {
        debug!(%reason, "StopReason::from_openai: called");
        match reason {
            "length" => StopReason::MaxTokens,
            "content_filter" => StopReason::ContentFilter,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Streaming chunk delivered while a completion is in flight
#[derive(Debug, Clone)]
pub enum StreamChunk {
    /// Text being generated
    TextDelta(String),

    /// Message complete with final stats
    MessageDone { stop_reason: StopReason, usage: TokenUsage },

    /// Error during streaming
    Error(String),
}
