//! Generator - submission lifecycle around the streaming pipeline
//!
//! Each goal becomes a numbered submission. The generator renders the prompt,
//! starts the transport, feeds every delta through a fresh [`TaskStream`] in
//! arrival order and reports decoded tasks to the presentation side as
//! [`GeneratorEvent`]s. A newer submission supersedes an older one: the older
//! consumer stops at its next delta and its remaining deltas are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eyre::Result;
use taskstream::{DecodeError, StreamEvent, Task, TaskStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient, StreamChunk};
use crate::prompts::PromptLoader;

/// Sequence number of a submission; later submissions have larger numbers
pub type SubmissionId = u64;

/// Buffered deltas between transport and consumer
const CHUNK_CHANNEL_CAPACITY: usize = 256;

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The transport finished normally
    Completed {
        tasks: usize,
        rejected: usize,
        /// The response ended in the middle of an object
        truncated: bool,
    },
    /// The transport failed; tasks already emitted remain valid
    Failed(String),
}

/// What the presentation side receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorEvent {
    Started { submission: SubmissionId, goal: String },
    Task { submission: SubmissionId, task: Task },
    Rejected { submission: SubmissionId, error: DecodeError },
    Finished { submission: SubmissionId, outcome: Outcome },
}

impl GeneratorEvent {
    pub fn submission(&self) -> SubmissionId {
        match self {
            GeneratorEvent::Started { submission, .. }
            | GeneratorEvent::Task { submission, .. }
            | GeneratorEvent::Rejected { submission, .. }
            | GeneratorEvent::Finished { submission, .. } => *submission,
        }
    }
}

/// Handle to a running submission
pub struct Submission {
    pub id: SubmissionId,
    handle: JoinHandle<()>,
}

impl Submission {
    /// Wait for the submission's consumer to finish
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            warn!(submission = self.id, error = %e, "Submission::wait: consumer task failed");
        }
    }
}

/// Turns goals into streamed checklists
pub struct Generator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    current: Arc<AtomicU64>,
}

impl Generator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(max_tokens, "Generator::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of the most recent submission (0 before the first)
    pub fn current(&self) -> SubmissionId {
        self.current.load(Ordering::SeqCst)
    }

    /// Start generating a checklist for `goal`, superseding any running submission
    ///
    /// Fails only if the prompt cannot be rendered; transport problems arrive
    /// later as [`Outcome::Failed`].
    pub fn submit(&self, goal: &str, events: mpsc::Sender<GeneratorEvent>) -> Result<Submission> {
        let prompt = self.prompts.render(goal)?;
        let request = CompletionRequest::user_prompt(prompt, self.max_tokens);

        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        info!(submission = id, %goal, "Generator::submit: starting submission");

        let handle = tokio::spawn(run_submission(
            self.llm.clone(),
            request,
            id,
            goal.trim().to_string(),
            self.current.clone(),
            events,
        ));
        Ok(Submission { id, handle })
    }
}

async fn run_submission(
    llm: Arc<dyn LlmClient>,
    request: CompletionRequest,
    id: SubmissionId,
    goal: String,
    current: Arc<AtomicU64>,
    events: mpsc::Sender<GeneratorEvent>,
) {
    let is_current = || current.load(Ordering::SeqCst) == id;

    if events
        .send(GeneratorEvent::Started { submission: id, goal })
        .await
        .is_err()
    {
        debug!(submission = id, "run_submission: no listener, not starting");
        return;
    }

    let (chunk_tx, mut chunk_rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
    let transport = tokio::spawn(async move { llm.stream(request, chunk_tx).await });

    let mut stream = TaskStream::new();
    let mut tasks = 0;

    while let Some(chunk) = chunk_rx.recv().await {
        if !is_current() {
            debug!(submission = id, "run_submission: superseded, dropping remaining deltas");
            transport.abort();
            return;
        }

        let delta = match chunk {
            StreamChunk::TextDelta(delta) => delta,
            StreamChunk::MessageDone { stop_reason, usage } => {
                debug!(submission = id, ?stop_reason, ?usage, "run_submission: message done");
                continue;
            }
            StreamChunk::Error(message) => {
                debug!(submission = id, %message, "run_submission: transport reported error");
                continue;
            }
        };

        for event in stream.push(&delta) {
            let event = match event {
                StreamEvent::Task(task) => {
                    tasks += 1;
                    GeneratorEvent::Task { submission: id, task }
                }
                StreamEvent::Rejected(error) => GeneratorEvent::Rejected { submission: id, error },
            };
            if events.send(event).await.is_err() {
                debug!(submission = id, "run_submission: listener gone");
                transport.abort();
                return;
            }
        }
    }

    let truncated = stream.finish().is_some();
    let outcome = match transport.await {
        Ok(Ok(response)) => {
            debug!(submission = id, stop_reason = ?response.stop_reason, "run_submission: transport finished");
            Outcome::Completed {
                tasks,
                rejected: stream.rejected(),
                truncated,
            }
        }
        Ok(Err(e)) => {
            warn!(submission = id, error = %e, "run_submission: generation failed");
            Outcome::Failed(e.to_string())
        }
        Err(e) => {
            warn!(submission = id, error = %e, "run_submission: transport task failed");
            Outcome::Failed(format!("transport task failed: {}", e))
        }
    };

    if !is_current() {
        debug!(submission = id, "run_submission: superseded before finishing");
        return;
    }
    info!(submission = id, ?outcome, "run_submission: finished");
    let _ = events.send(GeneratorEvent::Finished { submission: id, outcome }).await;
}
