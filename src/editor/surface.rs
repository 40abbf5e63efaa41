//! The capability interface between the controller and an editing engine.

use crate::markup::InlineStyle;

use super::command::FormatCommand;

/// A position between two cells of a block.
///
/// Ordering is document order: by block, then by offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Caret {
    /// Zero-based block index.
    pub block: usize,
    /// Number of cells before the caret inside the block.
    pub offset: usize,
}

impl Caret {
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection: the fixed `anchor` and the moving `head`.
///
/// A collapsed selection (anchor == head) is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Caret,
    pub head: Caret,
}

impl Selection {
    pub const fn caret(at: Caret) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    pub const fn range(anchor: Caret, head: Caret) -> Self {
        Self { anchor, head }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// The earlier end of the selection.
    pub fn start(&self) -> Caret {
        self.anchor.min(self.head)
    }

    /// The later end of the selection.
    pub fn end(&self) -> Caret {
        self.anchor.max(self.head)
    }
}

/// Everything the controller needs from the editable region.
///
/// Implemented by [`super::RichSurface`] for real editing and by fakes in
/// tests. Implementations own the content; the controller only reads it
/// back as markup.
pub trait EditingSurface {
    /// Replace the content, dropping the selection and undo history.
    fn load_markup(&mut self, markup: &str);

    /// Serialize the current content.
    fn markup(&self) -> String;

    /// The current selection, or `None` when the surface has no caret.
    fn selection(&self) -> Option<Selection>;

    /// Apply a formatting command at the current selection.
    ///
    /// Callers must check [`Self::selection`] first; without a selection
    /// implementations leave the content untouched.
    fn apply_command(&mut self, command: &FormatCommand);

    /// Whether `style` is active for the current selection.
    fn query_state(&self, style: InlineStyle) -> bool;

    /// Give the surface input focus, placing a caret if it has none.
    fn focus(&mut self);

    /// Whether the content holds at least one image.
    fn contains_image(&self) -> bool {
        crate::markup::parse(&self.markup()).has_images()
    }

    /// Step back through the edit history. Returns `true` if content changed.
    fn undo(&mut self) -> bool {
        false
    }

    /// Step forward through the edit history. Returns `true` if content changed.
    fn redo(&mut self) -> bool {
        false
    }
}
