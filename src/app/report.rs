use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::app::Model;
use crate::markup::character_count;

/// What the editor hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReport {
    pub markup: String,
    pub characters: usize,
    /// Number of `changed` notifications during the session
    pub changes: usize,
}

impl ExitReport {
    pub fn new(markup: String, changes: usize) -> Self {
        let characters = character_count(&markup);
        Self {
            markup,
            characters,
            changes,
        }
    }

    /// Report the editor's own count, so it matches the status bar even
    /// when the markup is the untouched initial value.
    pub fn from_model(model: &Model) -> Self {
        Self {
            markup: model.output_markup(),
            characters: model.editor.character_count(),
            changes: model.changes.borrow().count,
        }
    }

    /// The bare markup, or a JSON object with `json`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            serde_json::to_string_pretty(self).context("Failed to serialize report")
        } else {
            Ok(self.markup.clone())
        }
    }

    /// Write to `path`, or to stdout when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, json: bool, path: Option<&Path>) -> Result<()> {
        let text = self.render(json)?;
        match path {
            Some(path) => std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{text}").context("Failed to write to stdout")?;
                out.flush().context("Failed to write to stdout")
            }
        }
    }
}
