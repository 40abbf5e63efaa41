use crate::markup::InlineStyle;

use super::surface::EditingSurface;

/// Toolbar highlighting for the current selection.
///
/// Derived from the surface, never authoritative: the controller
/// recomputes it after every command and selection change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FormatState {
    /// Project the surface's current selection.
    pub fn query<S: EditingSurface + ?Sized>(surface: &S) -> Self {
        Self {
            bold: surface.query_state(InlineStyle::Bold),
            italic: surface.query_state(InlineStyle::Italic),
            underline: surface.query_state(InlineStyle::Underline),
        }
    }

    pub const fn get(self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Bold => self.bold,
            InlineStyle::Italic => self.italic,
            InlineStyle::Underline => self.underline,
        }
    }
}

impl std::fmt::Display for FormatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.bold, 'B'),
            flag(self.italic, 'I'),
            flag(self.underline, 'U')
        )
    }
}
