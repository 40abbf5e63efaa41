use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};
use crate::editor::Motion;
use crate::ui::ToolbarAction;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => {
                if model.prompt.is_some() {
                    Some(Message::PromptInput(text.clone()))
                } else {
                    Some(Message::Paste(text.clone()))
                }
            }
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if model.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(Message::PromptSubmit),
                KeyCode::Backspace => Some(Message::PromptBackspace),
                KeyCode::Char(c) if !ctrl && !alt => Some(Message::PromptInput(c.to_string())),
                _ => None,
            };
        }

        if ctrl {
            return match key.code {
                KeyCode::Char('b') => Some(Message::Toolbar(ToolbarAction::Bold)),
                KeyCode::Char('i') => Some(Message::Toolbar(ToolbarAction::Italic)),
                KeyCode::Char('u') => Some(Message::Toolbar(ToolbarAction::Underline)),
                KeyCode::Char('l') => Some(Message::Toolbar(ToolbarAction::Link)),
                KeyCode::Char('g') => Some(Message::Toolbar(ToolbarAction::Image)),
                // Most terminals report Ctrl+\ as Ctrl+4
                KeyCode::Char('\\' | '4') => Some(Message::Toolbar(ToolbarAction::ClearFormat)),
                KeyCode::Char('z') if shift => Some(Message::Redo),
                KeyCode::Char('Z') => Some(Message::Redo),
                KeyCode::Char('z') => Some(Message::Undo),
                KeyCode::Char('y') => Some(Message::Redo),
                KeyCode::Char('a') => Some(Message::SelectAll),
                KeyCode::Char('c') => Some(Message::CopyMarkup),
                KeyCode::Char('s') => Some(Message::EmitSnapshot),
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Left => Some(Message::Move(Motion::WordLeft, shift)),
                KeyCode::Right => Some(Message::Move(Motion::WordRight, shift)),
                KeyCode::Home => Some(Message::Move(Motion::DocumentStart, shift)),
                KeyCode::End => Some(Message::Move(Motion::DocumentEnd, shift)),
                _ => None,
            };
        }

        if alt {
            return match key.code {
                KeyCode::Char('8') => Some(Message::Toolbar(ToolbarAction::BulletList)),
                KeyCode::Char('7') => Some(Message::Toolbar(ToolbarAction::NumberedList)),
                _ => None,
            };
        }

        let page = usize::from(model.editor_text_area().height.max(1));
        match key.code {
            KeyCode::Char(c) => Some(Message::Insert(c)),
            KeyCode::Enter => Some(Message::NewLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::Move(Motion::Left, shift)),
            KeyCode::Right => Some(Message::Move(Motion::Right, shift)),
            KeyCode::Up => Some(Message::Move(Motion::Up, shift)),
            KeyCode::Down => Some(Message::Move(Motion::Down, shift)),
            KeyCode::Home => Some(Message::Move(Motion::LineStart, shift)),
            KeyCode::End => Some(Message::Move(Motion::LineEnd, shift)),
            KeyCode::PageUp => Some(Message::ScrollUp(page)),
            KeyCode::PageDown => Some(Message::ScrollDown(page)),
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Esc => Some(Message::Discard),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.prompt.is_some() {
            return None;
        }

        let area = Rect::new(0, 0, model.size.0, model.size.1);
        let toolbar = crate::ui::toolbar_area(area);
        let text_area = model.editor_text_area();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if point_in_rect(mouse.column, mouse.row, toolbar) =>
            {
                crate::ui::action_at(toolbar, mouse.column).map(Message::Toolbar)
            }
            MouseEventKind::Down(MouseButton::Left)
                if point_in_rect(mouse.column, mouse.row, text_area) =>
            {
                let caret = caret_for_point(model, text_area, mouse.column, mouse.row);
                let extend = mouse.modifiers.contains(KeyModifiers::SHIFT);
                Some(Message::PointAt(caret, extend))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let caret = caret_for_point(model, text_area, mouse.column, mouse.row);
                Some(Message::PointAt(caret, true))
            }
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(3)),
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(3)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Map a screen cell to a caret, clamping points outside the text area.
fn caret_for_point(model: &Model, text_area: Rect, col: u16, row: u16) -> crate::editor::Caret {
    let max_row = text_area.y + text_area.height.saturating_sub(1);
    let row = row.clamp(text_area.y, max_row.max(text_area.y));
    let layout_row = model.scroll_offset + usize::from(row - text_area.y);
    let layout_col = usize::from(col.saturating_sub(text_area.x));
    model.layout().caret_at(layout_row, layout_col)
}
