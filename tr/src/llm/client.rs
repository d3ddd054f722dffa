//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{CompletionRequest, CompletionResponse, LlmError, StreamChunk};

/// Stateless streaming LLM client - each call is independent
///
/// Implementations send every text delta to `chunk_tx` in arrival order and
/// finish with [`StreamChunk::MessageDone`] on success. The returned response
/// carries the full concatenated text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError>;
}
