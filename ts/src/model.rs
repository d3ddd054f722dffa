//! Checklist records produced by the decoder

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Locally assigned identifier for a task, step or component
///
/// Never taken from model output; the model cannot be trusted to produce
/// unique or stable identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh, time-ordered identifier
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a task is meant to be done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Repeatable every day
    Daily,
    /// Once, today only
    Today,
    /// Once a week
    Weekly,
}

impl Category {
    /// All categories, in the order they are presented to the model
    pub const ALL: [Category; 3] = [Category::Daily, Category::Today, Category::Weekly];

    /// Canonical wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Daily => "Daily",
            Category::Today => "Today",
            Category::Weekly => "Weekly",
        }
    }

    /// Parse a category leniently, returning `None` for anything unrecognized
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let category = Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed));
        if category.is_none() {
            debug!(%raw, "Category::parse: unrecognized category");
        }
        category
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// One checklist item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: ItemId,
    /// `None` when the model omitted the type or used an unknown one
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub task: String,
    pub completed: bool,
    /// Raw link text; validity is checked where it is displayed
    pub link: Option<String>,
    pub steps: Option<Vec<Step>>,
    pub components: Option<Vec<Component>>,
}

impl Task {
    /// Create an incomplete task with a fresh id and no nested items
    pub fn new(task: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            id: ItemId::new(),
            category,
            task: task.into(),
            completed: false,
            link: None,
            steps: None,
            components: None,
        }
    }

    /// Steps in source order, empty when the model sent none
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// Components in source order, empty when the model sent none
    pub fn components(&self) -> &[Component] {
        self.components.as_deref().unwrap_or_default()
    }

    pub fn step_mut(&mut self, id: ItemId) -> Option<&mut Step> {
        self.steps.as_mut()?.iter_mut().find(|s| s.id == id)
    }

    pub fn component_mut(&mut self, id: ItemId) -> Option<&mut Component> {
        self.components.as_mut()?.iter_mut().find(|c| c.id == id)
    }
}

/// An ordered sub-instruction of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: ItemId,
    pub step: String,
    pub completed: bool,
}

impl Step {
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            step: step.into(),
            completed: false,
        }
    }
}

/// Something a task needs (an ingredient, a tool, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ItemId,
    pub component: String,
    pub completed: bool,
}

impl Component {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            component: component.into(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_lenient() {
        assert_eq!(Category::parse("Daily"), Some(Category::Daily));
        assert_eq!(Category::parse("today"), Some(Category::Today));
        assert_eq!(Category::parse("  WEEKLY "), Some(Category::Weekly));
        assert_eq!(Category::parse("Monthly"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("weekly".parse::<Category>(), Ok(Category::Weekly));
        assert!("yearly".parse::<Category>().is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 36);
    }

    #[test]
    fn test_task_lookup_by_id() {
        let mut task = Task::new("Make eggs", Some(Category::Today));
        let step = Step::new("Crack eggs");
        let step_id = step.id;
        task.steps = Some(vec![step, Step::new("Cook eggs")]);

        assert!(task.component_mut(step_id).is_none());
        let found = task.step_mut(step_id).expect("step should be found");
        found.completed = true;

        assert!(task.steps()[0].completed);
        assert!(!task.steps()[1].completed);
        assert!(task.components().is_empty());
    }
}
