//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod report;
mod update;

pub use model::{ChangeLog, Model, ToastLevel, UrlPrompt};
pub use report::ExitReport;
pub use update::{Message, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone, Default)]
pub struct App {
    value: String,
    placeholder: String,
    source_label: String,
    output: Option<PathBuf>,
    json: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an editor session for the given initial markup.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source_label: "untitled".to_string(),
            ..Self::default()
        }
    }

    /// Hint shown while the editor is empty.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Name shown in the status bar.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Where snapshots and the final report go, and in which format.
    #[must_use]
    pub fn with_output(mut self, path: Option<PathBuf>, json: bool) -> Self {
        self.output = path;
        self.json = json;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
