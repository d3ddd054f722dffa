//! Terminal rendering of checklists

use colored::Colorize;
use eyre::Result;
use reqwest::Url;
use taskstream::{Category, DecodeError, Task};

use crate::checklist::Checklist;

fn checkbox(completed: bool) -> String {
    if completed {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    }
}

fn label(text: &str, completed: bool) -> String {
    if completed {
        text.strikethrough().dimmed().to_string()
    } else {
        text.to_string()
    }
}

fn badge(category: Category) -> String {
    let text = format!("({})", category);
    match category {
        Category::Daily => text.cyan().to_string(),
        Category::Today => text.yellow().to_string(),
        Category::Weekly => text.magenta().to_string(),
    }
}

/// A link is shown as one only when it parses as a URL
pub fn link(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) => url.as_str().blue().underline().to_string(),
        Err(_) => raw.dimmed().to_string(),
    }
}

/// One-line summary of a task: `[ ] 1. Drink water (Daily)`
pub fn task_line(position: usize, task: &Task) -> String {
    let mut line = format!("{} {}. {}", checkbox(task.completed), position, label(&task.task, task.completed));
    if let Some(category) = task.category {
        line.push(' ');
        line.push_str(&badge(category));
    }
    line
}

/// A task with its link, components and steps
pub fn task_block(position: usize, task: &Task) -> String {
    let mut lines = vec![task_line(position, task)];

    if let Some(raw) = &task.link {
        lines.push(format!("      {}", link(raw)));
    }
    for (index, component) in task.components().iter().enumerate() {
        lines.push(format!(
            "      {} {}.{} {}",
            checkbox(component.completed),
            position,
            index + 1,
            label(&component.component, component.completed)
        ));
    }
    if !task.steps().is_empty() {
        lines.push(format!("      {}", "Steps:".bold()));
    }
    for (index, step) in task.steps().iter().enumerate() {
        lines.push(format!(
            "      {} {}.{} {}",
            checkbox(step.completed),
            position,
            index + 1,
            label(&step.step, step.completed)
        ));
    }

    lines.join("\n")
}

/// One dropped object, as reported while streaming
pub fn rejection(error: &DecodeError) -> String {
    format!("{} {}", "skipped:".yellow(), error).dimmed().to_string()
}

/// The whole checklist followed by its status line
pub fn checklist(list: &Checklist) -> String {
    let mut blocks = Vec::new();
    if let Some(goal) = list.goal() {
        blocks.push(goal.bold().to_string());
    }
    if list.is_empty() {
        blocks.push("No tasks.".dimmed().to_string());
    }
    for (index, task) in list.tasks().iter().enumerate() {
        blocks.push(task_block(index + 1, task));
    }
    blocks.push(status(list));
    blocks.join("\n")
}

/// Progress plus anything that went wrong
pub fn status(list: &Checklist) -> String {
    let (done, total) = list.progress();
    let mut parts = vec![format!("{}/{} done", done, total)];

    if list.is_loading() {
        parts.push("generating...".to_string());
    }
    if !list.rejected().is_empty() {
        parts.push(format!("{} skipped", list.rejected().len()));
    }
    if list.is_truncated() {
        parts.push("response cut off".to_string());
    }

    let line = parts.join(", ").dimmed().to_string();
    match list.error() {
        Some(error) => format!("{}\n{} {}", line, "error:".red().bold(), error),
        None => line,
    }
}

/// One task as a single JSON line
pub fn json_line(task: &Task) -> Result<String> {
    Ok(serde_json::to_string(task)?)
}
