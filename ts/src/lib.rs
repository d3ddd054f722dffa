//! TaskStream - incremental checklist extraction from streamed LLM output
//!
//! A chat-completion model answers a goal with a sequence of bare JSON objects,
//! one per checklist task, delivered as arbitrarily chunked text deltas. This
//! crate turns those deltas into decoded [`Task`] records as soon as each object
//! is complete, without waiting for the whole response.
//!
//! # Pipeline
//!
//! ```text
//! delta ──► StreamAccumulator::append
//!              │
//!              ▼  (loop until None)
//!           StreamAccumulator::extract_next ──► TaskDecoder::decode ──► StreamEvent
//! ```
//!
//! # Example
//!
//! ```
//! use taskstream::{StreamEvent, TaskStream};
//!
//! let mut stream = TaskStream::new();
//! assert!(stream.push("{\"task\": \"Drink wa").is_empty());
//!
//! let events = stream.push("ter\", \"type\": \"Daily\"}\n");
//! match &events[0] {
//!     StreamEvent::Task(task) => assert_eq!(task.task, "Drink water"),
//!     StreamEvent::Rejected(err) => panic!("unexpected: {err}"),
//! }
//! ```

mod accumulator;
mod decoder;
mod model;
mod stream;

pub use accumulator::StreamAccumulator;
pub use decoder::{DecodeError, TaskDecoder, encode};
pub use model::{Category, Component, ItemId, Step, Task};
pub use stream::{StreamEvent, TaskStream};
