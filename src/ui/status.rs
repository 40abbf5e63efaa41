use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::editor::EditingSurface;

/// Label in front of the live character count.
pub const COUNTER_LABEL: &str = "字符数";

/// The live character counter under the editor.
pub fn render_counter(model: &Model, frame: &mut Frame, area: Rect) {
    let counter = Paragraph::new(format!(
        "{COUNTER_LABEL}: {} ",
        model.editor.character_count()
    ))
    .alignment(Alignment::Right)
    .style(Style::default().fg(Color::Indexed(245)));
    frame.render_widget(counter, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let position = model
        .editor
        .surface()
        .selection()
        .map(|selection| {
            let (row, col) = model.layout().caret_position(selection.head);
            format!("Ln {}, Col {}", row + 1, col + 1)
        })
        .unwrap_or_default();
    let modified = if model.is_modified() {
        " [modified]"
    } else {
        ""
    };

    let status = format!(
        " {}{}  [{}]  {}  F1:help",
        model.source_label,
        modified,
        model.editor.format_state(),
        position
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        crate::app::ToastLevel::Error => {
            ("[error]", Style::default().bg(Color::Red).fg(Color::White))
        }
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
