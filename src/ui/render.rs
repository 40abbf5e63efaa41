use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Model;
use crate::editor::{Caret, EditingSurface};
use crate::markup::Cell;

use super::layout::{EditorLayout, IMAGE_PLACEHOLDER};
use super::style::{
    border_style, image_style, marker_style, placeholder_style, selection_style, style_for_text,
};
use super::{overlays, status, toolbar};

/// The screen split into its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRows {
    pub toolbar: Rect,
    /// Bordered editor box
    pub editor: Rect,
    /// Character counter row
    pub footer: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

pub fn split_rows(area: Rect, toast_active: bool) -> ScreenRows {
    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ];
    if toast_active {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    ScreenRows {
        toolbar: chunks[0],
        editor: chunks[1],
        footer: chunks[2],
        toast: toast_active.then(|| chunks[3]),
        status: chunks[chunks.len() - 1],
    }
}

pub fn toolbar_area(area: Rect) -> Rect {
    split_rows(area, false).toolbar
}

/// Where editor text is drawn: the editor box minus its border.
pub fn editor_text_area(area: Rect, toast_active: bool) -> Rect {
    split_rows(area, toast_active)
        .editor
        .inner(Margin::new(1, 1))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let rows = split_rows(area, model.active_toast().is_some());

    toolbar::render_toolbar(model.editor.format_state(), frame, rows.toolbar);
    render_editor(model, frame, rows.editor);
    status::render_counter(model, frame, rows.footer);
    if let Some(toast_area) = rows.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, rows.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(prompt) = &model.prompt {
        overlays::render_prompt_overlay(prompt, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let modified = if model.is_modified() { " [+]" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", model.source_label, modified))
        .borders(Borders::ALL)
        .border_style(border_style(model.prompt.is_none() && !model.help_visible));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let surface = model.editor.surface();
    let content = surface.content();
    let layout = EditorLayout::new(content, inner.width);
    let selected = surface
        .selection()
        .filter(|s| !s.is_collapsed())
        .map(|s| (s.start(), s.end()));

    let height = usize::from(inner.height);
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for visual in layout.lines().iter().skip(model.scroll_offset).take(height) {
        let Some(block) = content.block(visual.block) else {
            continue;
        };
        let mut spans = vec![Span::styled(visual.prefix.clone(), marker_style())];
        for (idx, cell) in block.cells[visual.start..visual.end].iter().enumerate() {
            let at = Caret::new(visual.block, visual.start + idx);
            let (text, style) = match cell {
                Cell::Char { ch, marks, link } => (ch.to_string(), style_for_text(*marks, link.is_some())),
                Cell::Image { .. } => (IMAGE_PLACEHOLDER.to_string(), image_style()),
            };
            let in_selection = selected.is_some_and(|(start, end)| at >= start && at < end);
            spans.push(Span::styled(
                text,
                if in_selection {
                    selection_style(style)
                } else {
                    style
                },
            ));
        }
        lines.push(Line::from(spans));
    }

    if model.editor.placeholder_visible()
        && model.scroll_offset == 0
        && let Some(first) = lines.first_mut()
        && layout.lines().first().is_some_and(|l| l.start == l.end)
    {
        first.push_span(Span::styled(
            model.editor.placeholder().to_string(),
            placeholder_style(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    if model.prompt.is_some() || model.help_visible {
        return;
    }
    if let Some(selection) = surface.selection() {
        let (row, col) = layout.caret_position(selection.head);
        if row >= model.scroll_offset && row < model.scroll_offset + height {
            let x = inner.x + u16::try_from(col).unwrap_or(u16::MAX).min(inner.width - 1);
            let y = inner.y + u16::try_from(row - model.scroll_offset).unwrap_or(0);
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
