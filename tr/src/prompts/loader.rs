//! Prompt Loader
//!
//! Loads the prompt template from a configured file or falls back to the
//! embedded default, then renders it for a goal.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::config::PromptConfig;

/// Name of the checklist template
const TASKS_TEMPLATE: &str = "tasks";

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// What the user wants to achieve
    pub goal: String,
    /// Category names the model may use as `type`
    pub categories: Vec<String>,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Template file overriding the embedded prompt
    override_path: Option<PathBuf>,
    categories: Vec<String>,
}

impl PromptLoader {
    /// Create a loader from prompt configuration
    pub fn new(config: &PromptConfig) -> Self {
        debug!(template = ?config.template, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_path: config.template.clone(),
            categories: config.categories.clone(),
        }
    }

    /// Create a loader that only uses the embedded prompt
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self::new(&PromptConfig::default())
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Output is a plain-text prompt, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load the template text
    fn load_template(&self) -> Result<String> {
        if let Some(path) = &self.override_path {
            debug!(?path, "PromptLoader::load_template: using configured template");
            return std::fs::read_to_string(path)
                .map_err(|e| eyre!("Failed to read prompt template {}: {}", path.display(), e));
        }

        debug!("PromptLoader::load_template: using embedded template");
        embedded::get_embedded(TASKS_TEMPLATE)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", TASKS_TEMPLATE))
    }

    /// Render the checklist prompt for a goal
    pub fn render(&self, goal: &str) -> Result<String> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(eyre!("Goal must not be empty"));
        }

        let context = PromptContext {
            goal: goal.to_string(),
            categories: self.categories.clone(),
        };
        let template = self.load_template()?;
        info!("Rendering prompt for goal '{}'", context.goal);

        self.hbs
            .render_template(&template, &context)
            .map_err(|e| eyre!("Failed to render template {}: {}", TASKS_TEMPLATE, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_embedded() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.render("  make eggs ").unwrap();

        assert!(prompt.ends_with("The goal is: make eggs\n"));
        assert!(prompt.contains("- \"Daily\""));
        assert!(prompt.contains("- \"Weekly\""));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_render_does_not_escape_goal() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.render("bake a \"lava\" cake & eat it").unwrap();
        assert!(prompt.contains("bake a \"lava\" cake & eat it"));
    }

    #[test]
    fn test_render_rejects_empty_goal() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.render("   ").is_err());
    }

    #[test]
    fn test_render_configured_template() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Goal={{{{goal}}}} Types={{{{#each categories}}}}{{{{this}}}};{{{{/each}}}}").unwrap();

        let loader = PromptLoader::new(&PromptConfig {
            template: Some(file.path().to_path_buf()),
            categories: vec!["Daily".to_string(), "Weekly".to_string()],
        });

        assert_eq!(loader.render("run").unwrap(), "Goal=run Types=Daily;Weekly;");
    }

    #[test]
    fn test_missing_configured_template_errors() {
        let loader = PromptLoader::new(&PromptConfig {
            template: Some(PathBuf::from("/nonexistent/tasks.pmt")),
            ..Default::default()
        });
        assert!(loader.render("run").is_err());
    }
}
