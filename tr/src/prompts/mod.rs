//! Prompt Template System
//!
//! Renders the checklist prompt sent to the model for a goal.
//!
//! Template loading chain:
//! 1. Template file named in config (`prompt.template`)
//! 2. Embedded `tasks.pmt` compiled into the binary
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
