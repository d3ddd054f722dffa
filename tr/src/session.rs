//! Driving one submission from goal to finished checklist

use eyre::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::checklist::Checklist;
use crate::cli::OutputFormat;
use crate::generator::{Generator, GeneratorEvent};
use crate::render;

/// Events buffered between generator and presentation
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Submit `goal` and print tasks as they arrive, returning the finished checklist
///
/// Text output prints each task block; JSON output prints one task per line
/// and sends skipped objects to stderr so stdout stays parseable.
pub async fn stream_checklist(generator: &Generator, goal: &str, format: OutputFormat) -> Result<Checklist> {
    debug!(%goal, ?format, "stream_checklist: called");
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let submission = generator.submit(goal, tx)?;

    let mut list = Checklist::new();
    list.begin(submission.id);

    while let Some(event) = rx.recv().await {
        match &event {
            GeneratorEvent::Task { task, .. } => {
                let position = list.tasks().len() + 1;
                match format {
                    OutputFormat::Text => println!("{}", render::task_block(position, task)),
                    OutputFormat::Json => println!("{}", render::json_line(task)?),
                }
            }
            GeneratorEvent::Rejected { error, .. } => match format {
                OutputFormat::Text => println!("{}", render::rejection(error)),
                OutputFormat::Json => eprintln!("{}", render::rejection(error)),
            },
            GeneratorEvent::Started { .. } | GeneratorEvent::Finished { .. } => {}
        }
        list.apply(event);
    }

    submission.wait().await;
    debug!(tasks = list.tasks().len(), "stream_checklist: done");
    Ok(list)
}
