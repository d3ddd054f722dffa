//! Accumulator and decoder wired together for one submission

use tracing::{debug, warn};

use crate::accumulator::StreamAccumulator;
use crate::decoder::{DecodeError, TaskDecoder};
use crate::model::Task;

/// Outcome of one extracted object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A complete object decoded into a task
    Task(Task),
    /// A complete object that failed to decode; it has been dropped
    Rejected(DecodeError),
}

/// Turns deltas of a single streamed response into decoded tasks
///
/// Deltas must be pushed in arrival order. Call [`reset`](Self::reset) before
/// reusing the stream for a new submission.
#[derive(Debug, Default)]
pub struct TaskStream {
    accumulator: StreamAccumulator,
    decoder: TaskDecoder,
    extracted: usize,
    rejected: usize,
}

impl TaskStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous submission
    pub fn reset(&mut self) {
        debug!("TaskStream::reset: called");
        self.accumulator.reset();
        self.extracted = 0;
        self.rejected = 0;
    }

    /// Append a delta and return every object it completed, in order
    pub fn push(&mut self, delta: &str) -> Vec<StreamEvent> {
        self.accumulator.append(delta);

        let mut events = Vec::new();
        while let Some(raw) = self.accumulator.extract_next() {
            self.extracted += 1;
            match self.decoder.decode(&raw) {
                Ok(task) => events.push(StreamEvent::Task(task)),
                Err(err) => {
                    self.rejected += 1;
                    warn!(kind = err.kind(), error = %err, "TaskStream::push: dropping undecodable object");
                    events.push(StreamEvent::Rejected(err));
                }
            }
        }
        events
    }

    /// Close out the stream, returning the text of an object left unfinished
    ///
    /// Trailing prose after the last object (a sign-off line, a closing code
    /// fence) is discarded and not reported. The stream is left empty.
    pub fn finish(&mut self) -> Option<String> {
        let truncated = self.accumulator.in_object();
        let blank = self.accumulator.is_blank();
        let remainder = self.accumulator.take_remainder();
        debug!(
            extracted = self.extracted,
            rejected = self.rejected,
            remainder_len = remainder.len(),
            "TaskStream::finish: called"
        );
        if truncated {
            warn!(remainder_len = remainder.len(), "TaskStream::finish: stream ended mid-object");
            return Some(remainder);
        }
        if !blank {
            debug!(remainder_len = remainder.len(), "TaskStream::finish: discarding trailing text");
        }
        None
    }

    /// Objects extracted since the last reset, decoded or not
    pub fn extracted(&self) -> usize {
        self.extracted
    }

    /// Objects rejected by the decoder since the last reset
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn buffered(&self) -> &str {
        self.accumulator.buffered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn tasks(events: &[StreamEvent]) -> Vec<&Task> {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Task(task) => Some(task),
                StreamEvent::Rejected(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_chunked_daily_tasks() {
        let deltas = [
            "{\"task\": \"Dr",
            "ink water\", \"typ",
            "e\": \"Daily\"}",
            "\n{\"task\":\"Ex",
            "ercise\",\"type\":\"Daily\"}",
        ];
        let mut stream = TaskStream::new();
        let mut events = Vec::new();
        for delta in deltas {
            events.extend(stream.push(delta));
        }

        let tasks = tasks(&events);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task, "Drink water");
        assert_eq!(tasks[0].category, Some(Category::Daily));
        assert!(!tasks[0].completed);
        assert_eq!(tasks[1].task, "Exercise");
        assert_eq!(tasks[1].category, Some(Category::Daily));
        assert!(!tasks[1].completed);
        assert_eq!(stream.finish(), None);
    }

    #[test]
    fn test_objects_are_emitted_as_soon_as_complete() {
        let mut stream = TaskStream::new();
        assert!(stream.push("{\"task\":\"a\"}\n{\"task\":").len() == 1);
        assert_eq!(stream.buffered(), "{\"task\":");
        assert_eq!(stream.push("\"b\"}").len(), 1);
    }

    #[test]
    fn test_malformed_object_does_not_block_neighbours() {
        let mut stream = TaskStream::new();
        let events = stream.push("{\"task\":\"before\"}\n{\"task\": \"Bad\", \"type\":}\n{\"task\":\"after\"}");

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], StreamEvent::Task(t) if t.task == "before"));
        assert!(matches!(&events[1], StreamEvent::Rejected(DecodeError::MalformedJson(_))));
        assert!(matches!(&events[2], StreamEvent::Task(t) if t.task == "after"));
        assert_eq!(stream.extracted(), 3);
        assert_eq!(stream.rejected(), 1);
    }

    #[test]
    fn test_missing_task_advances_buffer() {
        let mut stream = TaskStream::new();
        let events = stream.push("{\"type\":\"Daily\"},\n");
        assert_eq!(
            events,
            vec![StreamEvent::Rejected(DecodeError::MissingRequiredField("task".to_string()))]
        );
        assert!(stream.buffered().is_empty());

        let events = stream.push("{\"task\":\"next\"}");
        assert_eq!(tasks(&events)[0].task, "next");
    }

    #[test]
    fn test_reset_behaves_like_fresh_stream() {
        let mut stream = TaskStream::new();
        stream.push("{\"task\":\"old\"}{\"task\":\"half");
        stream.reset();
        assert_eq!(stream.extracted(), 0);

        let events = stream.push("{\"task\":\"new\"}");
        let tasks = tasks(&events);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "new");
    }

    #[test]
    fn test_finish_reports_truncated_object() {
        let mut stream = TaskStream::new();
        stream.push("{\"task\":\"a\"}\n{\"task\":\"cut off");
        assert_eq!(stream.finish().as_deref(), Some("{\"task\":\"cut off"));
        assert!(stream.buffered().is_empty());
    }

    #[test]
    fn test_finish_ignores_trailing_prose() {
        let mut stream = TaskStream::new();
        let events = stream.push("{\"task\":\"a\"}\n{\"task\":\"b\"}\nEnjoy your day!");
        assert_eq!(tasks(&events).len(), 2);
        assert_eq!(stream.finish(), None);
        assert!(stream.buffered().is_empty());
    }

    #[test]
    fn test_finish_ignores_closing_code_fence() {
        let mut stream = TaskStream::new();
        let events = stream.push("```json\n{\"task\":\"a\"}\n```");
        assert_eq!(tasks(&events).len(), 1);
        assert_eq!(stream.finish(), None);
    }
}
