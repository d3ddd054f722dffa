//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Checklist generation prompt
pub const TASKS: &str = include_str!("../../prompts/tasks.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "tasks" => Some(TASKS),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
