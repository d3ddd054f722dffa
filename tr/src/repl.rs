//! Interactive checklist session

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::checklist::Checklist;
use crate::cli::OutputFormat;
use crate::generator::Generator;
use crate::render;
use crate::session::stream_checklist;

/// Result of handling a slash command
#[derive(Debug, PartialEq, Eq)]
enum SlashResult {
    Continue,
    Quit,
}

/// Which nested item a `/step` or `/component` command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nested {
    Step,
    Component,
}

/// Parse `N.M` into 1-based task and item positions
fn parse_position_pair(arg: &str) -> Option<(usize, usize)> {
    let (task, item) = arg.split_once('.')?;
    Some((task.trim().parse().ok()?, item.trim().parse().ok()?))
}

/// Interactive REPL session
pub struct ReplSession {
    generator: Generator,
    checklist: Checklist,
}

impl ReplSession {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            checklist: Checklist::new(),
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "goal>".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.generate(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Replace the checklist with one generated for `goal`
    ///
    /// A goal that cannot be submitted is reported and the current checklist kept.
    async fn generate(&mut self, goal: &str) {
        debug!(%goal, "ReplSession::generate: called");
        println!();
        match stream_checklist(&self.generator, goal, OutputFormat::Text).await {
            Ok(list) => {
                self.checklist = list;
                println!("{}", render::status(&self.checklist));
            }
            Err(e) => {
                warn!(error = %e, "ReplSession::generate: submission failed");
                println!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Taskr".bright_cyan().bold());
        println!("Type a goal to get a checklist.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let arg = parts.get(1).copied().unwrap_or("");
        debug!(%cmd, %arg, "ReplSession::handle_slash_command: called");

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/list" | "/l" => println!("{}", render::checklist(&self.checklist)),
            "/clear" | "/c" => {
                self.checklist = Checklist::new();
                println!("{}", "Checklist cleared.".dimmed());
            }
            "/toggle" | "/t" => self.toggle_task(arg),
            "/step" | "/s" => self.toggle_nested(arg, Nested::Step),
            "/component" | "/co" => self.toggle_nested(arg, Nested::Component),
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn toggle_task(&mut self, arg: &str) {
        let Some(id) = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| self.checklist.task_at(n))
            .map(|t| t.id)
        else {
            println!("{} No task '{}'. Usage: /toggle N", "!".red(), arg);
            return;
        };

        self.checklist.toggle_task(id);
        println!("{}", render::checklist(&self.checklist));
    }

    fn toggle_nested(&mut self, arg: &str, nested: Nested) {
        let found = parse_position_pair(arg).and_then(|(task_pos, item_pos)| {
            let task = self.checklist.task_at(task_pos)?;
            let index = item_pos.checked_sub(1)?;
            let item_id = match nested {
                Nested::Step => task.steps().get(index)?.id,
                Nested::Component => task.components().get(index)?.id,
            };
            Some((task.id, item_id))
        });

        let Some((task_id, item_id)) = found else {
            let usage = match nested {
                Nested::Step => "/step N.M",
                Nested::Component => "/component N.M",
            };
            println!("{} Nothing at '{}'. Usage: {}", "!".red(), arg, usage);
            return;
        };

        match nested {
            Nested::Step => self.checklist.toggle_step(task_id, item_id),
            Nested::Component => self.checklist.toggle_component(task_id, item_id),
        };
        println!("{}", render::checklist(&self.checklist));
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Commands:".bold());
        println!("  {}          Generate a new checklist (replaces the current one)", "<goal>".cyan());
        println!("  {}    Show the checklist", "/list, /l".cyan());
        println!("  {}  Toggle task N", "/toggle N, /t".cyan());
        println!("  {}  Toggle step M of task N", "/step N.M, /s".cyan());
        println!("  {} Toggle component M of task N", "/component N.M".cyan());
        println!("  {}   Clear the checklist", "/clear, /c".cyan());
        println!("  {}    Show this help", "/help, /h".cyan());
        println!("  {}    Exit", "/quit, /q".cyan());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptConfig;
    use crate::generator::GeneratorEvent;
    use crate::llm::ScriptedClient;
    use crate::prompts::PromptLoader;
    use std::path::PathBuf;
    use std::sync::Arc;
    use taskstream::{Component, Step, Task};

    fn session_with_eggs() -> ReplSession {
        let generator = Generator::new(Arc::new(ScriptedClient::new("")), PromptLoader::embedded_only(), 512);
        let mut session = ReplSession::new(generator);

        let mut task = Task::new("Make eggs", None);
        task.components = Some(vec![Component::new("2 eggs")]);
        task.steps = Some(vec![Step::new("Crack eggs"), Step::new("Cook")]);
        session.checklist.begin(1);
        session.checklist.apply(GeneratorEvent::Task { submission: 1, task });
        session
    }

    #[test]
    fn test_parse_position_pair() {
        assert_eq!(parse_position_pair("2.3"), Some((2, 3)));
        assert_eq!(parse_position_pair("2"), None);
        assert_eq!(parse_position_pair("a.1"), None);
    }

    #[test]
    fn test_slash_toggles() {
        let mut session = session_with_eggs();

        assert_eq!(session.handle_slash_command("/toggle 1"), SlashResult::Continue);
        assert_eq!(session.handle_slash_command("/step 1.2"), SlashResult::Continue);
        assert_eq!(session.handle_slash_command("/component 1.1"), SlashResult::Continue);

        let task = session.checklist.task_at(1).unwrap();
        assert!(task.completed);
        assert!(!task.steps()[0].completed);
        assert!(task.steps()[1].completed);
        assert!(task.components()[0].completed);
    }

    #[test]
    fn test_out_of_range_positions_change_nothing() {
        let mut session = session_with_eggs();

        session.handle_slash_command("/toggle 2");
        session.handle_slash_command("/step 1.3");
        session.handle_slash_command("/step 1.0");
        session.handle_slash_command("/component 1.9");

        let task = session.checklist.task_at(1).unwrap();
        assert!(!task.completed);
        assert!(task.steps().iter().all(|s| !s.completed));
        assert!(task.components().iter().all(|c| !c.completed));
    }

    #[tokio::test]
    async fn test_failed_goal_keeps_session_and_checklist() {
        let prompts = PromptLoader::new(&PromptConfig {
            template: Some(PathBuf::from("/nonexistent/tasks.pmt")),
            ..Default::default()
        });
        let generator = Generator::new(Arc::new(ScriptedClient::new("{\"task\":\"x\"}")), prompts, 512);
        let mut session = ReplSession::new(generator);
        session.checklist = session_with_eggs().checklist;

        session.generate("breakfast").await;

        assert_eq!(session.checklist.tasks().len(), 1);
        assert_eq!(session.checklist.task_at(1).unwrap().task, "Make eggs");
        assert_eq!(session.handle_slash_command("/toggle 1"), SlashResult::Continue);
    }

    #[test]
    fn test_quit_and_clear() {
        let mut session = session_with_eggs();
        assert_eq!(session.handle_slash_command("/clear"), SlashResult::Continue);
        assert!(session.checklist.is_empty());
        assert_eq!(session.handle_slash_command("/q"), SlashResult::Quit);
    }
}
