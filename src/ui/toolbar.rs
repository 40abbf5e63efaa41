//! The fixed formatting toolbar.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::editor::{FormatCommand, FormatState, PromptKind};
use crate::markup::InlineStyle;

use super::style::toolbar_style;

/// One toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Underline,
    BulletList,
    NumberedList,
    Link,
    Image,
    ClearFormat,
}

impl ToolbarAction {
    /// Buttons in display order.
    pub const ALL: [Self; 8] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::BulletList,
        Self::NumberedList,
        Self::Link,
        Self::Image,
        Self::ClearFormat,
    ];

    /// Text drawn on the button.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
            Self::BulletList => "•",
            Self::NumberedList => "1.",
            Self::Link => "Link",
            Self::Image => "Img",
            Self::ClearFormat => "Clear",
        }
    }

    /// Tooltip title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bold => "加粗",
            Self::Italic => "斜体",
            Self::Underline => "下划线",
            Self::BulletList => "无序列表",
            Self::NumberedList => "有序列表",
            Self::Link => "插入链接",
            Self::Image => "插入图片",
            Self::ClearFormat => "清除格式",
        }
    }

    pub const fn shortcut(self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Underline => "Ctrl+U",
            Self::BulletList => "Alt+8",
            Self::NumberedList => "Alt+7",
            Self::Link => "Ctrl+L",
            Self::Image => "Ctrl+G",
            Self::ClearFormat => "Ctrl+\\",
        }
    }

    /// The command run directly, or `None` for buttons that ask for a URL.
    pub const fn command(self) -> Option<FormatCommand> {
        match self {
            Self::Bold => Some(FormatCommand::Bold),
            Self::Italic => Some(FormatCommand::Italic),
            Self::Underline => Some(FormatCommand::Underline),
            Self::BulletList => Some(FormatCommand::InsertUnorderedList),
            Self::NumberedList => Some(FormatCommand::InsertOrderedList),
            Self::ClearFormat => Some(FormatCommand::RemoveFormat),
            Self::Link | Self::Image => None,
        }
    }

    /// The URL prompt opened by this button.
    pub const fn prompt(self) -> Option<PromptKind> {
        match self {
            Self::Link => Some(PromptKind::Link),
            Self::Image => Some(PromptKind::Image),
            _ => None,
        }
    }

    /// The inline style this button reflects.
    pub const fn style(self) -> Option<InlineStyle> {
        match self {
            Self::Bold => Some(InlineStyle::Bold),
            Self::Italic => Some(InlineStyle::Italic),
            Self::Underline => Some(InlineStyle::Underline),
            _ => None,
        }
    }

    fn button_width(self) -> u16 {
        // " label " plus one separator column
        u16::try_from(unicode_width::UnicodeWidthStr::width(self.label())).unwrap_or(0) + 3
    }
}

/// The button under column `col` of the toolbar row.
pub fn action_at(area: Rect, col: u16) -> Option<ToolbarAction> {
    let mut x = area.x;
    for action in ToolbarAction::ALL {
        let width = action.button_width();
        if col >= x && col < x + width - 1 {
            return Some(action);
        }
        x += width;
    }
    None
}

pub fn render_toolbar(state: FormatState, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(ToolbarAction::ALL.len() * 2);
    for action in ToolbarAction::ALL {
        let active = action.style().is_some_and(|s| state.get(s));
        spans.push(Span::styled(
            format!(" {} ", action.label()),
            toolbar_style(active),
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
