//! Scripted LLM client
//!
//! Streams a prerecorded response in fixed-size pieces, the way a provider
//! delivers deltas. Backs the `replay` command and the generator tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, StreamChunk, TokenUsage};

/// Default number of characters per delta
pub const DEFAULT_CHUNK_CHARS: usize = 7;

/// Client that replays a fixed response
#[derive(Debug, Clone)]
pub struct ScriptedClient {
    response: String,
    chunk_chars: usize,
    delay: Option<Duration>,
    fail_after: Option<usize>,
}

impl ScriptedClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            chunk_chars: DEFAULT_CHUNK_CHARS,
            delay: None,
            fail_after: None,
        }
    }

    /// Characters per delta (at least one)
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Pause between deltas
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail with a stream error after sending this many deltas
    pub fn failing_after(mut self, deltas: usize) -> Self {
        self.fail_after = Some(deltas);
        self
    }

    /// The response split into deltas on char boundaries
    pub fn deltas(&self) -> Vec<String> {
        let chars: Vec<char> = self.response.chars().collect();
        chars
            .chunks(self.chunk_chars)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        let deltas = self.deltas();
        debug!(
            delta_count = deltas.len(),
            prompt_len = request.prompt.len(),
            "ScriptedClient::stream: called"
        );

        let mut sent = String::new();
        for (index, delta) in deltas.into_iter().enumerate() {
            if self.fail_after == Some(index) {
                debug!(index, "ScriptedClient::stream: injecting failure");
                let message = format!("scripted failure after {} deltas", index);
                let _ = chunk_tx.send(StreamChunk::Error(message.clone())).await;
                return Err(LlmError::Stream(message));
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            sent.push_str(&delta);
            if chunk_tx.send(StreamChunk::TextDelta(delta)).await.is_err() {
                debug!("ScriptedClient::stream: receiver dropped");
                break;
            }
        }

        let usage = TokenUsage {
            input_tokens: 0,
            output_tokens: sent.chars().count() as u64,
        };
        let _ = chunk_tx
            .send(StreamChunk::MessageDone {
                stop_reason: StopReason::EndTurn,
                usage: usage.clone(),
            })
            .await;

        Ok(CompletionResponse {
            content: Some(sent),
            stop_reason: StopReason::EndTurn,
            usage,
        })
    }
}
