//! Taskr - goals in, live checklists out
//!
//! Taskr sends a goal to a chat-completion model and shows the resulting
//! checklist while the answer is still streaming. Deltas from the model flow
//! through a [`taskstream::TaskStream`], and every task is reported the moment
//! its JSON object closes.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait, OpenAI streaming client, scripted replay client
//! - [`prompts`] - Handlebars prompt loading and rendering
//! - [`generator`] - Submission lifecycle and supersession
//! - [`checklist`] - Presentation-side task collection and toggling
//! - [`render`] - Terminal and JSON output
//! - [`repl`] - Interactive session
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod checklist;
pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod prompts;
pub mod render;
pub mod repl;
pub mod session;

pub use checklist::Checklist;
pub use config::{Config, LlmConfig, PromptConfig};
pub use generator::{Generator, GeneratorEvent, Outcome, Submission, SubmissionId};
pub use llm::{LlmClient, LlmError, OpenAIClient, ScriptedClient, create_client};
pub use prompts::{PromptContext, PromptLoader};
pub use repl::ReplSession;
pub use session::stream_checklist;
