//! Checklist - the presentation-side collection of emitted tasks
//!
//! Holds the tasks of the most recent submission in extraction order and lets
//! the user tick off tasks, steps and components by id.

use taskstream::{DecodeError, ItemId, Task};
use tracing::debug;

use crate::generator::{GeneratorEvent, Outcome, SubmissionId};

/// Tasks of the current submission plus its loading state
#[derive(Debug, Default)]
pub struct Checklist {
    submission: Option<SubmissionId>,
    goal: Option<String>,
    tasks: Vec<Task>,
    rejected: Vec<DecodeError>,
    loading: bool,
    truncated: bool,
    error: Option<String>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing a new submission, discarding the previous list
    pub fn begin(&mut self, submission: SubmissionId) {
        debug!(submission, "Checklist::begin: called");
        *self = Self {
            submission: Some(submission),
            loading: true,
            ..Self::default()
        };
    }

    /// Apply an event from the generator
    ///
    /// Returns `false` when the event belongs to another submission and was
    /// ignored. A `Started` event for a newer submission begins it.
    pub fn apply(&mut self, event: GeneratorEvent) -> bool {
        let submission = event.submission();

        if let GeneratorEvent::Started { goal, .. } = &event
            && self.submission.is_none_or(|current| submission > current)
        {
            self.begin(submission);
            self.goal = Some(goal.clone());
            return true;
        }

        if self.submission != Some(submission) {
            debug!(submission, current = ?self.submission, "Checklist::apply: ignoring stale event");
            return false;
        }

        match event {
            GeneratorEvent::Started { goal, .. } => {
                self.goal = Some(goal);
            }
            GeneratorEvent::Task { task, .. } => {
                debug!(id = %task.id, "Checklist::apply: appending task");
                self.tasks.push(task);
            }
            GeneratorEvent::Rejected { error, .. } => {
                self.rejected.push(error);
            }
            GeneratorEvent::Finished { outcome, .. } => {
                debug!(?outcome, "Checklist::apply: finished");
                self.loading = false;
                match outcome {
                    Outcome::Completed { truncated, .. } => self.truncated = truncated,
                    Outcome::Failed(message) => self.error = Some(message),
                }
            }
        }
        true
    }

    pub fn submission(&self) -> Option<SubmissionId> {
        self.submission
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn rejected(&self) -> &[DecodeError] {
        &self.rejected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the response ended inside an unfinished object
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Transport failure message, if the submission failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task by 1-based position
    pub fn task_at(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|index| self.tasks.get(index))
    }

    /// Completed and total top-level tasks
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.completed).count();
        (done, self.tasks.len())
    }

    fn task_mut(&mut self, id: ItemId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Flip a task's completion; `false` if no task has that id
    pub fn toggle_task(&mut self, id: ItemId) -> bool {
        debug!(%id, "Checklist::toggle_task: called");
        match self.task_mut(id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Flip a step's completion within a task
    pub fn toggle_step(&mut self, task_id: ItemId, step_id: ItemId) -> bool {
        debug!(%task_id, %step_id, "Checklist::toggle_step: called");
        match self.task_mut(task_id).and_then(|t| t.step_mut(step_id)) {
            Some(step) => {
                step.completed = !step.completed;
                true
            }
            None => false,
        }
    }

    /// Flip a component's completion within a task
    pub fn toggle_component(&mut self, task_id: ItemId, component_id: ItemId) -> bool {
        debug!(%task_id, %component_id, "Checklist::toggle_component: called");
        match self.task_mut(task_id).and_then(|t| t.component_mut(component_id)) {
            Some(component) => {
                component.completed = !component.completed;
                true
            }
            None => false,
        }
    }
}
