//! Wrapping rich content into terminal rows.
//!
//! Every block becomes one or more visual lines. List items get a marker
//! prefix on their first line and an equally wide indent on the rest.

use unicode_width::UnicodeWidthChar;

use crate::editor::Caret;
use crate::markup::{BlockKind, Cell, RichText};

/// What an image occupies on screen.
pub const IMAGE_PLACEHOLDER: &str = "[img]";

const BULLET_MARKER: &str = "• ";

/// One terminal row of wrapped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    /// Index of the block this row belongs to
    pub block: usize,
    /// First cell on the row
    pub start: usize,
    /// One past the last cell on the row
    pub end: usize,
    /// Marker or indent drawn before the cells
    pub prefix: String,
    /// Whether this is the block's final row
    pub last_in_block: bool,
    widths: Vec<usize>,
}

impl VisualLine {
    /// Display width of the prefix.
    pub fn prefix_width(&self) -> usize {
        text_width(&self.prefix)
    }

    /// Display width of each cell on the row.
    pub fn cell_widths(&self) -> &[usize] {
        &self.widths
    }
}

/// The wrapped layout of a document at a given width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorLayout {
    lines: Vec<VisualLine>,
}

impl EditorLayout {
    /// Wrap `content` into rows at most `width` columns wide.
    pub fn new(content: &RichText, width: u16) -> Self {
        let width = usize::from(width).max(1);
        let mut lines = Vec::new();
        let mut number = 0usize;
        for (block_idx, block) in content.blocks().iter().enumerate() {
            let marker = match block.kind {
                BlockKind::Paragraph => {
                    number = 0;
                    String::new()
                }
                BlockKind::Bullet => {
                    number = 0;
                    BULLET_MARKER.to_string()
                }
                BlockKind::Numbered => {
                    number += 1;
                    format!("{number}. ")
                }
            };
            let indent = " ".repeat(text_width(&marker));
            let avail = width.saturating_sub(text_width(&marker)).max(1);

            let widths: Vec<usize> = block.cells.iter().map(cell_width).collect();
            let mut start = 0;
            let mut used = 0;
            let mut rows: Vec<(usize, usize)> = Vec::new();
            for (idx, w) in widths.iter().enumerate() {
                if used + w > avail && idx > start {
                    rows.push((start, idx));
                    start = idx;
                    used = 0;
                }
                used += w;
            }
            rows.push((start, widths.len()));

            let row_count = rows.len();
            for (row_idx, (start, end)) in rows.into_iter().enumerate() {
                lines.push(VisualLine {
                    block: block_idx,
                    start,
                    end,
                    prefix: if row_idx == 0 {
                        marker.clone()
                    } else {
                        indent.clone()
                    },
                    last_in_block: row_idx + 1 == row_count,
                    widths: widths[start..end].to_vec(),
                });
            }
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Row and column where the caret is drawn.
    pub fn caret_position(&self, caret: Caret) -> (usize, usize) {
        let found = self.lines.iter().enumerate().find(|(_, line)| {
            line.block == caret.block
                && caret.offset >= line.start
                && (caret.offset < line.end || line.last_in_block)
        });
        let Some((row, line)) = found else {
            return (self.lines.len().saturating_sub(1), 0);
        };
        let inner = caret.offset.min(line.end) - line.start;
        let col = line.prefix_width() + line.widths[..inner].iter().sum::<usize>();
        (row, col)
    }

    /// The caret closest to a row and column, for mouse clicks.
    pub fn caret_at(&self, row: usize, col: usize) -> Caret {
        let Some(line) = self.lines.get(row.min(self.lines.len().saturating_sub(1))) else {
            return Caret::default();
        };
        let target = col.saturating_sub(line.prefix_width());
        let mut offset = line.start;
        let mut acc = 0;
        for w in &line.widths {
            if target < acc + w.div_ceil(2) {
                break;
            }
            acc += w;
            offset += 1;
        }
        // Past the end of a wrapped row the caret belongs to the next row.
        if !line.last_in_block && offset == line.end && line.end > line.start {
            offset -= 1;
        }
        Caret::new(line.block, offset)
    }
}

/// Columns occupied by one cell.
pub fn cell_width(cell: &Cell) -> usize {
    match cell {
        Cell::Char { ch, .. } => ch.width().unwrap_or(0).max(1),
        Cell::Image { .. } => IMAGE_PLACEHOLDER.len(),
    }
}

fn text_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    #[test]
    fn test_short_paragraph_is_one_line() {
        let layout = EditorLayout::new(&parse("hello"), 20);
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.lines()[0].prefix, "");
        assert_eq!(layout.caret_position(Caret::new(0, 5)), (0, 5));
    }

    #[test]
    fn test_wraps_at_width() {
        let layout = EditorLayout::new(&parse("abcdefgh"), 3);
        let spans: Vec<_> = layout.lines().iter().map(|l| (l.start, l.end)).collect();
        assert_eq!(spans, vec![(0, 3), (3, 6), (6, 8)]);
        assert_eq!(layout.caret_position(Caret::new(0, 3)), (1, 0));
        assert_eq!(layout.caret_position(Caret::new(0, 8)), (2, 2));
    }

    #[test]
    fn test_wide_characters_take_two_columns() {
        let layout = EditorLayout::new(&parse("你好世界"), 5);
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.caret_position(Caret::new(0, 2)), (1, 0));
        assert_eq!(layout.caret_position(Caret::new(0, 1)), (0, 2));
    }

    #[test]
    fn test_list_markers_and_numbering() {
        let content = parse("<ol><li>a</li><li>b</li></ol><ul><li>c</li></ul><ol><li>d</li></ol>");
        let layout = EditorLayout::new(&content, 20);
        let prefixes: Vec<_> = layout.lines().iter().map(|l| l.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["1. ", "2. ", "• ", "1. "]);
        assert_eq!(layout.caret_position(Caret::new(0, 1)), (0, 4));
    }

    #[test]
    fn test_continuation_rows_are_indented() {
        let layout = EditorLayout::new(&parse("<ul><li>abcdef</li></ul>"), 5);
        assert_eq!(layout.lines()[0].prefix, "• ");
        assert_eq!(layout.lines()[1].prefix, "  ");
    }

    #[test]
    fn test_images_use_placeholder_width() {
        let layout = EditorLayout::new(&parse(r#"a<img src="x.png">b"#), 40);
        assert_eq!(layout.caret_position(Caret::new(0, 2)), (0, 6));
    }

    #[test]
    fn test_empty_blocks_still_get_a_row() {
        let layout = EditorLayout::new(&parse("<p>a</p><p></p><p>b</p>"), 10);
        assert_eq!(layout.line_count(), 3);
        assert_eq!(layout.caret_position(Caret::new(1, 0)), (1, 0));
    }

    #[test]
    fn test_caret_at_maps_clicks_back_to_cells() {
        let layout = EditorLayout::new(&parse("<p>hello</p><ul><li>list</li></ul>"), 20);
        assert_eq!(layout.caret_at(0, 2), Caret::new(0, 2));
        assert_eq!(layout.caret_at(0, 99), Caret::new(0, 5));
        assert_eq!(layout.caret_at(1, 0), Caret::new(1, 0));
        assert_eq!(layout.caret_at(1, 3), Caret::new(1, 1));
        assert_eq!(layout.caret_at(9, 0), Caret::new(1, 0));
    }

    #[test]
    fn test_caret_at_end_of_wrapped_row_stays_on_row() {
        let layout = EditorLayout::new(&parse("abcdef"), 3);
        assert_eq!(layout.caret_at(0, 10), Caret::new(0, 2));
        assert_eq!(layout.caret_at(1, 10), Caret::new(0, 6));
    }
}
