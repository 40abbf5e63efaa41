// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorLayout)
    clippy::module_name_repetitions
)]

//! # tiebapad
//!
//! A terminal rich-text composer for forum posts.
//!
//! The editor offers a small, fixed set of formatting actions:
//! - Bold, italic and underline
//! - Bulleted and numbered lists
//! - Links and images from a URL
//! - Clearing inline formatting
//!
//! and reports the content as HTML markup with a live character count.
//!
//! ## Architecture
//!
//! The interactive shell uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! The editing logic itself lives in [`editor::EditableContentController`],
//! which drives any [`editor::EditingSurface`] and knows nothing about the
//! terminal.
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Content controller, formatting commands and the editing surface
//! - [`markup`]: Allow-listed HTML parsing, serialization and character counting
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults
//! - [`perf`]: Opt-in timing and debug event log

pub mod app;
pub mod config;
pub mod editor;
pub mod markup;
pub mod perf;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{
        EditableContentController, EditingSurface, Editor, FormatCommand, FormatOutcome,
        RichSurface,
    };
    pub use crate::markup::RichText;
}
