use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, UrlPrompt};

use super::toolbar::ToolbarAction;

pub fn prompt_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(16).clamp(20, 72);
    centered_popup_rect(popup_width, 7, area)
}

/// The URL prompt: question, typed text and a hint line.
pub fn render_prompt_overlay(prompt: &UrlPrompt, frame: &mut Frame, area: Rect) {
    let popup = prompt_rect(area);
    let block = Block::default()
        .title(prompt.kind.message())
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    if inner.height < 3 || inner.width == 0 {
        return;
    }

    // Keep the end of long input visible.
    let width = usize::from(inner.width.saturating_sub(1));
    let mut visible: &str = &prompt.input;
    while visible.width() > width {
        let mut chars = visible.chars();
        chars.next();
        visible = chars.as_str();
    }

    let input_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    frame.render_widget(
        Paragraph::new(visible).style(Style::default().add_modifier(Modifier::UNDERLINED)),
        input_area,
    );
    let hint_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Line::styled(
            "Enter confirms \u{2502} Esc cancels",
            Style::default().fg(Color::Indexed(245)),
        )),
        hint_area,
    );
    let cursor_x = inner.x + u16::try_from(visible.width()).unwrap_or(0);
    frame.set_cursor_position(Position::new(cursor_x, input_area.y));
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Formatting", section_style));
    for action in ToolbarAction::ALL {
        all_lines.push(Line::raw(format!(
            "  {:<20}{} ({})",
            action.shortcut(),
            action.title(),
            action.label()
        )));
    }
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Editing", section_style));
    all_lines.push(Line::raw("  Arrows, Home/End    Move caret"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Document start / end"));
    all_lines.push(Line::raw("  Shift+movement      Extend selection"));
    all_lines.push(Line::raw("  Ctrl+A              Select all"));
    all_lines.push(Line::raw("  Ctrl+Z / Ctrl+Y     Undo / redo"));
    all_lines.push(Line::raw("  Mouse click/drag    Place caret / select"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Output", section_style));
    all_lines.push(Line::raw("  Ctrl+C              Copy markup"));
    all_lines.push(Line::raw("  Ctrl+S              Write snapshot to --output"));
    all_lines.push(Line::raw("  Ctrl+Q              Quit and print markup"));
    all_lines.push(Line::raw("  Esc                 Quit and discard"));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .take(usize::from(content_height))
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
