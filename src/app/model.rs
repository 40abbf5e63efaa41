use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::editor::{EditingSurface, Editor, PromptKind, RichSurface};
use crate::ui::layout::EditorLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Everything the change listener has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    /// Number of `changed` notifications
    pub count: usize,
    /// Payload of the most recent notification
    pub latest: Option<String>,
}

/// Text typed into the URL prompt overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPrompt {
    pub kind: PromptKind,
    pub input: String,
}

impl UrlPrompt {
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The controller and its surface
    pub editor: Editor,
    /// Shared with the controller's change listener
    pub changes: Rc<RefCell<ChangeLog>>,
    /// Markup the editor was opened with
    pub initial_markup: String,
    /// File name (or "untitled") shown in the status bar
    pub source_label: String,
    /// Terminal size (width, height)
    pub size: (u16, u16),
    /// First visible layout row of the editor
    pub scroll_offset: usize,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Open URL prompt, if any
    pub prompt: Option<UrlPrompt>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after the first Esc with changes; a second Esc discards them
    pub quit_confirmed: bool,
    /// Quit without writing the final markup
    pub discard: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("document", &self.editor.document())
            .field("changes", &self.changes.borrow().count)
            .field("source_label", &self.source_label)
            .field("size", &self.size)
            .field("scroll_offset", &self.scroll_offset)
            .field("help_visible", &self.help_visible)
            .field("prompt", &self.prompt)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model editing `value`, with the caret at the end.
    pub fn new(value: &str, placeholder: &str, terminal_size: (u16, u16)) -> Self {
        let changes = Rc::new(RefCell::new(ChangeLog::default()));
        let sink = Rc::clone(&changes);
        let mut editor = Editor::new(RichSurface::new()).with_listener(move |markup| {
            let mut log = sink.borrow_mut();
            log.count += 1;
            log.latest = Some(markup.to_string());
        });
        editor.initialize(value, placeholder);
        editor.surface_mut().focus();
        editor.on_selection_changed();

        let mut model = Self {
            editor,
            changes,
            initial_markup: value.to_string(),
            source_label: "untitled".to_string(),
            size: terminal_size,
            scroll_offset: 0,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            prompt: None,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
            discard: false,
        };
        model.ensure_caret_visible();
        model
    }

    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Whether the controller has emitted any change.
    pub fn is_modified(&self) -> bool {
        self.changes.borrow().count > 0
    }

    /// The markup written on exit: the last change, or the initial value.
    pub fn output_markup(&self) -> String {
        self.changes
            .borrow()
            .latest
            .clone()
            .unwrap_or_else(|| self.initial_markup.clone())
    }

    /// Screen area of the editor text, inside its border.
    pub fn editor_text_area(&self) -> Rect {
        let area = Rect::new(0, 0, self.size.0, self.size.1);
        crate::ui::editor_text_area(area, self.active_toast().is_some())
    }

    /// Wrapped layout of the current content.
    pub fn layout(&self) -> EditorLayout {
        EditorLayout::new(
            self.editor.surface().content(),
            self.editor_text_area().width,
        )
    }

    /// Scroll so the caret row is inside the editor area.
    pub fn ensure_caret_visible(&mut self) {
        let Some(selection) = self.editor.surface().selection() else {
            return;
        };
        let height = usize::from(self.editor_text_area().height);
        let (row, _) = self.layout().caret_position(selection.head);
        if height == 0 {
            self.scroll_offset = row;
        } else if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + height {
            self.scroll_offset = row + 1 - height;
        }
    }

    pub fn max_scroll_offset(&self) -> usize {
        let height = usize::from(self.editor_text_area().height);
        self.layout().line_count().saturating_sub(height.max(1))
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if let Some(toast) = &self.toast
            && now >= toast.expires_at
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", "", (80, 24))
    }
}
