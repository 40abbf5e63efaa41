//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette, with a few
//! indexed shades that depend on the background brightness.

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::markup::Marks;

static LIGHT_BACKGROUND: AtomicBool = AtomicBool::new(false);

/// Select the palette. `Auto` falls back to the dark palette.
pub fn set_theme(mode: ThemeMode) {
    LIGHT_BACKGROUND.store(mode == ThemeMode::Light, Ordering::Relaxed);
}

pub fn is_light_background() -> bool {
    LIGHT_BACKGROUND.load(Ordering::Relaxed)
}

/// Style for a run of text carrying `marks`, optionally inside a link.
pub fn style_for_text(marks: Marks, linked: bool) -> Style {
    let mut style = Style::default();
    if marks.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if marks.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if marks.underline || linked {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if linked {
        style = style.fg(if is_light_background() {
            Color::Indexed(25)
        } else {
            Color::Cyan
        });
    }
    style
}

/// Image placeholders stand out from text.
pub fn image_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(90)
        } else {
            Color::Magenta
        })
        .add_modifier(Modifier::ITALIC)
}

/// List markers (bullets and numbers).
pub fn marker_style() -> Style {
    Style::default().fg(if is_light_background() {
        Color::Indexed(58)
    } else {
        Color::Yellow
    })
}

pub fn placeholder_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(245)
        } else {
            Color::Indexed(240)
        })
        .add_modifier(Modifier::ITALIC)
}

/// Highlight for selected cells, layered over the text style.
pub fn selection_style(base: Style) -> Style {
    base.add_modifier(Modifier::REVERSED)
}

pub fn toolbar_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(if is_light_background() {
            Color::Indexed(238)
        } else {
            Color::White
        })
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Indexed(240))
    }
}
