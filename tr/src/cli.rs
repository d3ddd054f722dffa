//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

use crate::llm::DEFAULT_CHUNK_CHARS;

/// Taskr - turn a goal into a checklist, live
#[derive(Parser)]
#[command(
    name = "taskr",
    about = "Turn a goal into a checklist streamed from a chat-completion model",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Output format for streamed tasks
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a checklist for a goal and print tasks as they arrive
    Generate {
        /// What you want to achieve
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },

    /// Stream a recorded model response through the pipeline (no network)
    Replay {
        /// File holding the raw response text
        file: PathBuf,

        /// Characters per simulated delta
        #[arg(long, default_value_t = DEFAULT_CHUNK_CHARS)]
        chunk_size: usize,
    },

    /// Print the prompt that would be sent for a goal
    Prompt {
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },

    /// Interactive session (default)
    Interactive,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Join goal words given on the command line
pub fn join_goal(words: &[String]) -> String {
    debug!(count = words.len(), "join_goal: called");
    words.join(" ")
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskr")
        .join("logs")
        .join("taskr.log");
    debug!(?path, "get_log_path: returning path");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["taskr"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_generate_joins_words() {
        let cli = Cli::try_parse_from(["taskr", "generate", "make", "eggs", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Command::Generate { goal }) => assert_eq!(join_goal(&goal), "make eggs"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replay_chunk_size() {
        let cli = Cli::try_parse_from(["taskr", "replay", "out.txt", "--chunk-size", "3"]).unwrap();
        match cli.command {
            Some(Command::Replay { file, chunk_size }) => {
                assert_eq!(file, PathBuf::from("out.txt"));
                assert_eq!(chunk_size, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generate_requires_goal() {
        assert!(Cli::try_parse_from(["taskr", "generate"]).is_err());
    }
}
