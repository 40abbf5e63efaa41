use std::rc::Rc;

use crate::markup::{Block, BlockKind, Cell, InlineStyle, Marks, RichText, parse, serialize};

use super::command::FormatCommand;
use super::history::{History, Snapshot};
use super::surface::{Caret, EditingSurface, Selection};

/// Caret movement for [`RichSurface::move_caret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// The built-in editing engine: structured content plus a selection.
///
/// Hosts route raw input (typing, deletion, caret movement) here the way a
/// browser routes keystrokes to an editable element; formatting goes
/// through [`EditingSurface::apply_command`].
#[derive(Debug, Clone, Default)]
pub struct RichSurface {
    content: RichText,
    selection: Option<Selection>,
    /// Typing style set by a style toggle at a collapsed caret.
    pending: Option<Marks>,
    history: History,
    /// Remembered offset for vertical movement (sticky column).
    col_memory: Option<usize>,
}

impl RichSurface {
    /// Create an empty, unfocused surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unfocused surface holding `markup`.
    pub fn from_markup(markup: &str) -> Self {
        let mut surface = Self::new();
        surface.load_markup(markup);
        surface
    }

    pub const fn content(&self) -> &RichText {
        &self.content
    }

    /// The typing style that the next inserted character will use, if it
    /// differs from the surrounding text.
    pub const fn pending_marks(&self) -> Option<Marks> {
        self.pending
    }

    pub const fn has_focus(&self) -> bool {
        self.selection.is_some()
    }

    /// Drop the caret.
    pub const fn blur(&mut self) {
        self.selection = None;
        self.pending = None;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection ---

    /// Replace the selection. Both ends are clamped into the content.
    pub fn set_selection(&mut self, selection: Selection) {
        let selection = Selection::range(self.clamp(selection.anchor), self.clamp(selection.head));
        if self.selection == Some(selection) {
            return;
        }
        self.selection = Some(selection);
        self.pending = None;
        self.col_memory = None;
        self.history.break_coalescing();
    }

    pub fn set_caret(&mut self, caret: Caret) {
        self.set_selection(Selection::caret(caret));
    }

    pub fn select_all(&mut self) {
        self.set_selection(Selection::range(Caret::default(), self.end_caret()));
    }

    /// Move the head of the selection. With `extend` the anchor stays put.
    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        let Some(selection) = self.selection else {
            return;
        };
        if !extend && !selection.is_collapsed() {
            match motion {
                Motion::Left => return self.set_caret(selection.start()),
                Motion::Right => return self.set_caret(selection.end()),
                _ => {}
            }
        }
        let vertical = matches!(motion, Motion::Up | Motion::Down);
        let memory = self.col_memory.unwrap_or(selection.head.offset);
        let head = self.target(selection.head, motion, memory);
        let next = if extend {
            Selection::range(selection.anchor, head)
        } else {
            Selection::caret(head)
        };
        self.set_selection(next);
        if vertical {
            self.col_memory = Some(memory);
        }
    }

    // --- Editing ---

    /// Type a character at the caret, replacing any selected content.
    ///
    /// Returns `false` when the surface has no caret.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_block();
        }
        let Some(selection) = self.selection else {
            return false;
        };
        self.record(selection.is_collapsed());
        let marks = self
            .pending
            .take()
            .unwrap_or_else(|| self.insertion_marks(selection));
        let at = self.collapse_for_insert(selection);
        let link = self.link_at(at);
        let caret = self.insert_cells(at, vec![Cell::Char { ch, marks, link }]);
        self.selection = Some(Selection::caret(caret));
        self.col_memory = None;
        true
    }

    /// Insert pasted text. Newlines start new blocks.
    ///
    /// Returns `false` when there is no caret or nothing to insert.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if text.chars().all(|c| c == '\r') {
            return false;
        }
        self.record(false);
        let marks = self
            .pending
            .take()
            .unwrap_or_else(|| self.insertion_marks(selection));
        let mut at = self.collapse_for_insert(selection);
        let link = self.link_at(at);
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                at = self.split_at(at);
            }
            let cells = line
                .chars()
                .filter(|c| *c != '\r')
                .map(|c| Cell::Char {
                    ch: if c == '\t' { ' ' } else { c },
                    marks,
                    link: link.clone(),
                })
                .collect();
            at = self.insert_cells(at, cells);
        }
        self.selection = Some(Selection::caret(at));
        self.col_memory = None;
        true
    }

    /// Split the current block at the caret (Enter).
    ///
    /// On an empty list item this leaves the list instead. Returns `false`
    /// when the surface has no caret.
    pub fn split_block(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        self.record(false);
        let at = self.collapse_for_insert(selection);
        if let Some(block) = self.content.block_mut(at.block)
            && block.kind.is_list()
            && block.is_empty()
        {
            block.kind = BlockKind::Paragraph;
            self.selection = Some(Selection::caret(at));
            return true;
        }
        let caret = self.split_at(at);
        self.selection = Some(Selection::caret(caret));
        self.col_memory = None;
        true
    }

    /// Delete the selection or the cell before the caret (Backspace).
    ///
    /// Returns `true` if the content changed.
    pub fn delete_back(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_selection(selection);
        }
        let at = selection.head;
        let kind = self.content.block(at.block).map(|b| b.kind);
        if at.offset > 0 {
            self.record(false);
            if let Some(block) = self.content.block_mut(at.block) {
                block.cells.remove(at.offset - 1);
            }
            self.selection = Some(Selection::caret(Caret::new(at.block, at.offset - 1)));
        } else if kind.is_some_and(BlockKind::is_list) {
            // Backspace at the start of a list item outdents it.
            self.record(false);
            if let Some(block) = self.content.block_mut(at.block) {
                block.kind = BlockKind::Paragraph;
            }
        } else if at.block > 0 {
            self.record(false);
            let caret = self.join_with_next(at.block - 1);
            self.selection = Some(Selection::caret(caret));
        } else {
            return false;
        }
        self.col_memory = None;
        true
    }

    /// Delete the selection or the cell after the caret (Delete).
    ///
    /// Returns `true` if the content changed.
    pub fn delete_forward(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_selection(selection);
        }
        let at = selection.head;
        if at.offset < self.block_len(at.block) {
            self.record(false);
            if let Some(block) = self.content.block_mut(at.block) {
                block.cells.remove(at.offset);
            }
        } else if at.block + 1 < self.content.block_count() {
            self.record(false);
            self.join_with_next(at.block);
        } else {
            return false;
        }
        self.col_memory = None;
        true
    }

    // --- Private helpers ---

    fn block_len(&self, block: usize) -> usize {
        self.content.block(block).map_or(0, Block::len)
    }

    fn clamp(&self, caret: Caret) -> Caret {
        let block = caret.block.min(self.content.block_count().saturating_sub(1));
        Caret::new(block, caret.offset.min(self.block_len(block)))
    }

    fn end_caret(&self) -> Caret {
        let last = self.content.block_count().saturating_sub(1);
        Caret::new(last, self.block_len(last))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            content: self.content.clone(),
            selection: self.selection,
        }
    }

    fn record(&mut self, coalesce: bool) {
        let before = self.snapshot();
        self.history.record(before, coalesce);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.content = snapshot.content;
        self.selection = snapshot
            .selection
            .map(|s| Selection::range(self.clamp(s.anchor), self.clamp(s.head)));
        self.pending = None;
        self.col_memory = None;
    }

    /// Cells between two carets, in document order.
    fn range_cells(&self, start: Caret, end: Caret) -> impl Iterator<Item = &Cell> {
        self.content.blocks()[start.block..=end.block]
            .iter()
            .enumerate()
            .flat_map(move |(idx, block)| {
                let block_idx = start.block + idx;
                let from = if block_idx == start.block { start.offset } else { 0 };
                let to = if block_idx == end.block { end.offset } else { block.len() };
                block.cells[from..to].iter()
            })
    }

    fn for_each_range_cell(&mut self, start: Caret, end: Caret, mut f: impl FnMut(&mut Cell)) {
        for block_idx in start.block..=end.block {
            let Some(block) = self.content.block_mut(block_idx) else {
                continue;
            };
            let from = if block_idx == start.block { start.offset } else { 0 };
            let to = if block_idx == end.block { end.offset } else { block.len() };
            block.cells[from..to].iter_mut().for_each(&mut f);
        }
    }

    /// Style of the text around a caret: the character before it, or the
    /// one after it at the start of a block.
    fn marks_at(&self, caret: Caret) -> Marks {
        let Some(block) = self.content.block(caret.block) else {
            return Marks::NONE;
        };
        let split = caret.offset.min(block.len());
        block.cells[..split]
            .iter()
            .rev()
            .find_map(Cell::marks)
            .or_else(|| block.cells[split..].iter().find_map(Cell::marks))
            .unwrap_or(Marks::NONE)
    }

    /// Style for text typed over `selection`.
    fn insertion_marks(&self, selection: Selection) -> Marks {
        if selection.is_collapsed() {
            return self.marks_at(selection.head);
        }
        self.range_cells(selection.start(), selection.end())
            .find_map(Cell::marks)
            .unwrap_or_else(|| self.marks_at(selection.start()))
    }

    /// Typing strictly inside a link extends it; at its edges it does not.
    fn link_at(&self, caret: Caret) -> Option<Rc<str>> {
        let block = self.content.block(caret.block)?;
        if caret.offset == 0 || caret.offset >= block.len() {
            return None;
        }
        match (&block.cells[caret.offset - 1], &block.cells[caret.offset]) {
            (
                Cell::Char {
                    link: Some(before), ..
                },
                Cell::Char {
                    link: Some(after), ..
                },
            ) if before == after => Some(Rc::clone(before)),
            _ => None,
        }
    }

    fn range_has_text(&self, start: Caret, end: Caret) -> bool {
        self.range_cells(start, end).any(Cell::is_text)
    }

    fn delete_range(&mut self, start: Caret, end: Caret) {
        if start.block == end.block {
            if let Some(block) = self.content.block_mut(start.block) {
                block.cells.drain(start.offset..end.offset);
            }
            return;
        }
        let tail = self
            .content
            .block_mut(end.block)
            .map(|b| b.cells.split_off(end.offset))
            .unwrap_or_default();
        if let Some(first) = self.content.block_mut(start.block) {
            first.cells.truncate(start.offset);
            first.cells.extend(tail);
        }
        self.content.remove_blocks(start.block + 1..end.block + 1);
    }

    fn delete_selection(&mut self, selection: Selection) -> bool {
        self.record(false);
        self.delete_range(selection.start(), selection.end());
        self.selection = Some(Selection::caret(selection.start()));
        self.col_memory = None;
        true
    }

    /// Remove selected content and return where new content goes.
    fn collapse_for_insert(&mut self, selection: Selection) -> Caret {
        if selection.is_collapsed() {
            return selection.head;
        }
        self.delete_range(selection.start(), selection.end());
        selection.start()
    }

    fn insert_cells(&mut self, at: Caret, cells: Vec<Cell>) -> Caret {
        let count = cells.len();
        if let Some(block) = self.content.block_mut(at.block) {
            block.cells.splice(at.offset..at.offset, cells);
        }
        Caret::new(at.block, at.offset + count)
    }

    fn split_at(&mut self, at: Caret) -> Caret {
        let Some(block) = self.content.block_mut(at.block) else {
            return at;
        };
        let tail = block.cells.split_off(at.offset);
        let kind = block.kind;
        self.content
            .insert_block(at.block + 1, Block { kind, cells: tail });
        Caret::new(at.block + 1, 0)
    }

    /// Append block `idx + 1` to block `idx`; returns the caret at the seam.
    fn join_with_next(&mut self, idx: usize) -> Caret {
        let seam = self.block_len(idx);
        let moved = self
            .content
            .block_mut(idx + 1)
            .map(|b| std::mem::take(&mut b.cells))
            .unwrap_or_default();
        if let Some(block) = self.content.block_mut(idx) {
            block.cells.extend(moved);
        }
        self.content.remove_blocks(idx + 1..idx + 2);
        Caret::new(idx, seam)
    }

    fn is_word_cell(&self, block: usize, offset: usize) -> bool {
        self.content
            .block(block)
            .and_then(|b| b.cells.get(offset))
            .and_then(Cell::as_char)
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }

    fn target(&self, head: Caret, motion: Motion, memory: usize) -> Caret {
        let len = self.block_len(head.block);
        let last_block = self.content.block_count().saturating_sub(1);
        match motion {
            Motion::Left if head.offset > 0 => Caret::new(head.block, head.offset - 1),
            Motion::Left | Motion::WordLeft if head.offset == 0 => {
                if head.block > 0 {
                    Caret::new(head.block - 1, self.block_len(head.block - 1))
                } else {
                    head
                }
            }
            Motion::Right if head.offset < len => Caret::new(head.block, head.offset + 1),
            Motion::Right | Motion::WordRight if head.offset >= len => {
                if head.block < last_block {
                    Caret::new(head.block + 1, 0)
                } else {
                    head
                }
            }
            Motion::WordLeft => {
                let mut i = head.offset;
                while i > 0 && !self.is_word_cell(head.block, i - 1) {
                    i -= 1;
                }
                while i > 0 && self.is_word_cell(head.block, i - 1) {
                    i -= 1;
                }
                Caret::new(head.block, i)
            }
            Motion::WordRight => {
                let mut i = head.offset;
                while i < len && self.is_word_cell(head.block, i) {
                    i += 1;
                }
                while i < len && !self.is_word_cell(head.block, i) {
                    i += 1;
                }
                Caret::new(head.block, i)
            }
            Motion::Up if head.block > 0 => {
                Caret::new(head.block - 1, memory.min(self.block_len(head.block - 1)))
            }
            Motion::Up => Caret::new(0, 0),
            Motion::Down if head.block < last_block => {
                Caret::new(head.block + 1, memory.min(self.block_len(head.block + 1)))
            }
            Motion::Down => Caret::new(head.block, len),
            Motion::LineStart => Caret::new(head.block, 0),
            Motion::LineEnd => Caret::new(head.block, len),
            Motion::DocumentStart => Caret::default(),
            Motion::DocumentEnd => self.end_caret(),
            // Remaining Left/Right guards are exhaustive above.
            Motion::Left | Motion::Right => head,
        }
    }

    fn toggle_style(&mut self, selection: Selection, style: InlineStyle) {
        let (start, end) = (selection.start(), selection.end());
        let (has_text, all_styled) = {
            let mut marks = self.range_cells(start, end).filter_map(Cell::marks).peekable();
            let has_text = marks.peek().is_some();
            (has_text, marks.all(|m| m.has(style)))
        };
        if selection.is_collapsed() || !has_text {
            let active = self.query_state(style);
            let base = self
                .pending
                .unwrap_or_else(|| self.marks_at(selection.head));
            self.pending = Some(base.with(style, !active));
            return;
        }
        self.record(false);
        self.for_each_range_cell(start, end, |cell| {
            if let Cell::Char { marks, .. } = cell {
                *marks = marks.with(style, !all_styled);
            }
        });
    }

    fn toggle_list(&mut self, start: Caret, end: Caret, kind: BlockKind) {
        self.record(false);
        let all_in_list = (start.block..=end.block)
            .all(|idx| self.content.block(idx).is_some_and(|b| b.kind == kind));
        let target = if all_in_list {
            BlockKind::Paragraph
        } else {
            kind
        };
        for idx in start.block..=end.block {
            if let Some(block) = self.content.block_mut(idx) {
                block.kind = target;
            }
        }
    }
}

impl EditingSurface for RichSurface {
    fn load_markup(&mut self, markup: &str) {
        self.content = parse(markup);
        self.selection = None;
        self.pending = None;
        self.col_memory = None;
        self.history.clear();
    }

    fn markup(&self) -> String {
        let _scope = crate::perf::scope("markup.serialize");
        serialize(&self.content)
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn apply_command(&mut self, command: &FormatCommand) {
        let Some(selection) = self.selection else {
            return;
        };
        if let Some(style) = command.style() {
            self.toggle_style(selection, style);
            return;
        }
        let (start, end) = (selection.start(), selection.end());
        match command {
            FormatCommand::RemoveFormat => {
                if selection.is_collapsed() || !self.range_has_text(start, end) {
                    self.pending = Some(Marks::NONE);
                } else {
                    self.record(false);
                    self.for_each_range_cell(start, end, |cell| {
                        if let Cell::Char { marks, .. } = cell {
                            *marks = Marks::NONE;
                        }
                    });
                }
            }
            FormatCommand::InsertUnorderedList => self.toggle_list(start, end, BlockKind::Bullet),
            FormatCommand::InsertOrderedList => self.toggle_list(start, end, BlockKind::Numbered),
            FormatCommand::CreateLink(url) => {
                let url = url.trim();
                let href: Rc<str> = Rc::from(url);
                self.record(false);
                if selection.is_collapsed() {
                    let marks = self
                        .pending
                        .take()
                        .unwrap_or_else(|| self.marks_at(start));
                    let cells = url
                        .chars()
                        .map(|ch| Cell::Char {
                            ch,
                            marks,
                            link: Some(Rc::clone(&href)),
                        })
                        .collect();
                    let caret = self.insert_cells(start, cells);
                    self.selection = Some(Selection::caret(caret));
                } else {
                    self.for_each_range_cell(start, end, |cell| {
                        if let Cell::Char { link, .. } = cell {
                            *link = Some(Rc::clone(&href));
                        }
                    });
                }
            }
            FormatCommand::InsertImage(url) => {
                self.record(false);
                let at = self.collapse_for_insert(selection);
                let caret = self.insert_cells(
                    at,
                    vec![Cell::Image {
                        src: Rc::from(url.trim()),
                    }],
                );
                self.selection = Some(Selection::caret(caret));
            }
            FormatCommand::Bold | FormatCommand::Italic | FormatCommand::Underline => {}
        }
        self.col_memory = None;
    }

    fn query_state(&self, style: InlineStyle) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if !selection.is_collapsed() {
            let mut marks = self
                .range_cells(selection.start(), selection.end())
                .filter_map(Cell::marks)
                .peekable();
            if marks.peek().is_some() {
                return marks.all(|m| m.has(style));
            }
        }
        self.pending
            .unwrap_or_else(|| self.marks_at(selection.head))
            .has(style)
    }

    fn focus(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::caret(self.end_caret()));
        }
    }

    fn contains_image(&self) -> bool {
        self.content.has_images()
    }

    fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }
}
