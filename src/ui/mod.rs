//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Wrapping rich content into terminal rows
//! - [`style`]: Theming and colors
//! - the toolbar, editor box, counter, status bar and overlays

pub mod layout;
pub mod style;

mod overlays;
mod render;
mod status;
mod toolbar;

pub use render::{ScreenRows, editor_text_area, render, split_rows, toolbar_area};
pub use status::COUNTER_LABEL;
pub use toolbar::{ToolbarAction, action_at};
