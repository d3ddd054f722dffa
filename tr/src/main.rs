//! Taskr - goals in, live checklists out
//!
//! CLI entry point.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use taskr::checklist::Checklist;
use taskr::cli::{Cli, Command, OutputFormat, get_log_path, join_goal};
use taskr::config::Config;
use taskr::generator::Generator;
use taskr::llm::{LlmClient, ScriptedClient, create_client};
use taskr::prompts::PromptLoader;
use taskr::render;
use taskr::repl::ReplSession;
use taskr::session::stream_checklist;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Taskr loaded config: provider={} model={}", config.llm.provider, config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Generate { goal }) => {
            debug!(?goal, "main: matched Generate command");
            cmd_generate(&config, &join_goal(&goal), cli.format).await
        }
        Some(Command::Replay { file, chunk_size }) => {
            debug!(?file, chunk_size, "main: matched Replay command");
            cmd_replay(&config, &file, chunk_size, cli.format).await
        }
        Some(Command::Prompt { goal }) => {
            debug!(?goal, "main: matched Prompt command");
            cmd_prompt(&config, &join_goal(&goal))
        }
        Some(Command::Interactive) | None => {
            debug!("main: launching interactive session");
            cmd_interactive(&config).await
        }
    }
}

fn build_generator(config: &Config, llm: Arc<dyn LlmClient>) -> Generator {
    Generator::new(llm, PromptLoader::new(&config.prompt), config.llm.max_tokens)
}

/// Print the final status and turn a failed submission into an error exit
fn finish(list: &Checklist, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render::status(list)),
        OutputFormat::Json => eprintln!("{}", render::status(list)),
    }
    match list.error() {
        Some(error) => Err(eyre::eyre!("Generation failed: {}", error)),
        None => Ok(()),
    }
}

/// Generate a checklist from the configured provider
async fn cmd_generate(config: &Config, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(%goal, "cmd_generate: called");
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let generator = build_generator(config, llm);

    let list = stream_checklist(&generator, goal, format).await?;
    finish(&list, format)
}

/// Replay a recorded response through the same pipeline
async fn cmd_replay(config: &Config, file: &Path, chunk_size: usize, format: OutputFormat) -> Result<()> {
    debug!(?file, chunk_size, "cmd_replay: called");
    let response =
        fs::read_to_string(file).context(format!("Failed to read recorded response {}", file.display()))?;
    let llm = Arc::new(ScriptedClient::new(response).with_chunk_chars(chunk_size));
    let generator = build_generator(config, llm);

    let goal = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "replay".to_string());
    let list = stream_checklist(&generator, &goal, format).await?;
    finish(&list, format)
}

/// Print the rendered prompt
fn cmd_prompt(config: &Config, goal: &str) -> Result<()> {
    debug!(%goal, "cmd_prompt: called");
    let prompt = PromptLoader::new(&config.prompt).render(goal)?;
    print!("{}", prompt);
    Ok(())
}

/// Run the interactive session
async fn cmd_interactive(config: &Config) -> Result<()> {
    debug!("cmd_interactive: called");
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let mut session = ReplSession::new(build_generator(config, llm));
    session.run().await
}
