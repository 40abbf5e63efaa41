//! The editable content controller and its editing engine.
//!
//! [`EditableContentController`] owns the document markup and talks to an
//! [`EditingSurface`]; [`RichSurface`] is the built-in surface used by the
//! terminal host. URL prompts go through an [`InputProvider`].

mod command;
mod controller;
mod format_state;
mod history;
mod input;
mod rich_surface;
mod surface;

pub use command::{CommandError, FormatCommand};
pub use controller::{ChangeListener, EditableContentController, FormatOutcome};
pub use format_state::FormatState;
pub use history::{DEFAULT_HISTORY_CAPACITY, History, Snapshot};
pub use input::{CancelledInput, InputProvider, PromptKind, ProvidedInput};
pub use rich_surface::{Motion, RichSurface};
pub use surface::{Caret, EditingSurface, Selection};

/// The controller wired to the built-in surface.
pub type Editor = EditableContentController<RichSurface>;
