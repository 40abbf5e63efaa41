//! Core content types.

use std::rc::Rc;

/// One of the character styles the toolbar can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
}

impl InlineStyle {
    /// All toggleable styles, in canonical nesting order.
    pub const ALL: [Self; 3] = [Self::Bold, Self::Italic, Self::Underline];

    /// The element name used when serializing this style.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
        }
    }
}

/// The set of styles carried by a single character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    /// No styling at all.
    pub const NONE: Self = Self {
        bold: false,
        italic: false,
        underline: false,
    };

    pub const fn has(self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Bold => self.bold,
            InlineStyle::Italic => self.italic,
            InlineStyle::Underline => self.underline,
        }
    }

    /// Return a copy with `style` switched on or off.
    #[must_use]
    pub const fn with(mut self, style: InlineStyle, on: bool) -> Self {
        match style {
            InlineStyle::Bold => self.bold = on,
            InlineStyle::Italic => self.italic = on,
            InlineStyle::Underline => self.underline = on,
        }
        self
    }

    pub const fn is_empty(self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

/// A single unit of content inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A styled character, optionally part of a link.
    Char {
        ch: char,
        marks: Marks,
        link: Option<Rc<str>>,
    },
    /// An inline image.
    Image { src: Rc<str> },
}

impl Cell {
    /// An unstyled, unlinked character.
    pub const fn plain(ch: char) -> Self {
        Self::Char {
            ch,
            marks: Marks::NONE,
            link: None,
        }
    }

    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char { ch, .. } => Some(*ch),
            Self::Image { .. } => None,
        }
    }

    pub const fn marks(&self) -> Option<Marks> {
        match self {
            Self::Char { marks, .. } => Some(*marks),
            Self::Image { .. } => None,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Char { link, .. } => link.as_deref(),
            Self::Image { .. } => None,
        }
    }

    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Char { .. })
    }
}

/// How a block is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockKind {
    #[default]
    Paragraph,
    /// Item of an unordered list
    Bullet,
    /// Item of an ordered list
    Numbered,
}

impl BlockKind {
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Bullet | Self::Numbered)
    }
}

/// A paragraph or list item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub cells: Vec<Cell>,
}

impl Block {
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            cells: Vec::new(),
        }
    }

    /// Build an unstyled block from plain text.
    pub fn from_text(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            cells: text.chars().map(Cell::plain).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The characters of this block, images skipped.
    pub fn text(&self) -> String {
        self.cells.iter().filter_map(Cell::as_char).collect()
    }
}

/// Structured rich content.
///
/// Always holds at least one block, so there is always somewhere to put
/// a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    blocks: Vec<Block>,
}

impl RichText {
    /// A document with a single empty paragraph.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::default()],
        }
    }

    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::default());
        }
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, idx: usize) -> Option<&Block> {
        self.blocks.get(idx)
    }

    pub(crate) fn block_mut(&mut self, idx: usize) -> Option<&mut Block> {
        self.blocks.get_mut(idx)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn insert_block(&mut self, idx: usize, block: Block) {
        self.blocks.insert(idx, block);
    }

    /// Remove blocks in `range`, keeping at least one block in place.
    pub(crate) fn remove_blocks(&mut self, range: std::ops::Range<usize>) {
        self.blocks.drain(range);
        if self.blocks.is_empty() {
            self.blocks.push(Block::default());
        }
    }

    /// Plain text with blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any block holds an image.
    pub fn has_images(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.cells.iter().any(|c| matches!(c, Cell::Image { .. })))
    }

    /// Whether the document contains no characters at all.
    pub fn is_blank(&self) -> bool {
        self.blocks
            .iter()
            .all(|b| b.cells.iter().all(|c| !c.is_text()))
    }
}

impl Default for RichText {
    fn default() -> Self {
        Self::empty()
    }
}
