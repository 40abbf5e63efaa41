use tracing::{debug, trace};

use crate::markup::character_count;
use crate::perf;

use super::command::{CommandError, FormatCommand};
use super::format_state::FormatState;
use super::input::{InputProvider, PromptKind};
use super::surface::EditingSurface;

/// Receives the full markup after every edit.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Result of a formatting request that was not refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The command ran and `changed` was emitted.
    Applied,
    /// The surface has no selection; nothing happened.
    NoSelection,
    /// The user dismissed the URL prompt; nothing happened.
    Cancelled,
}

/// Owns the rich text document for one editor instance.
///
/// The controller keeps the authoritative markup, executes formatting
/// commands against an [`EditingSurface`], tracks which inline styles are
/// active at the selection, and tells the host about every change.
pub struct EditableContentController<S: EditingSurface> {
    surface: S,
    document: String,
    /// Counted from the surface's content, not from `document`, so the
    /// value only moves when text does.
    characters: usize,
    placeholder: String,
    format_state: FormatState,
    listener: Option<ChangeListener>,
}

impl<S: EditingSurface> EditableContentController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            document: String::new(),
            characters: 0,
            placeholder: String::new(),
            format_state: FormatState::default(),
            listener: None,
        }
    }

    /// Builder-style variant of [`Self::set_listener`].
    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Load `value` into the surface and reset the format state.
    ///
    /// `value` is stored exactly as given. No change is emitted.
    pub fn initialize(&mut self, value: &str, placeholder: &str) {
        self.document = value.to_string();
        self.placeholder = placeholder.to_string();
        self.surface.load_markup(value);
        self.characters = character_count(&self.surface.markup());
        self.format_state = FormatState::default();
        debug!(
            characters = self.character_count(),
            "Initialized editable content"
        );
    }

    /// Pull the surface's markup after the user edited it.
    pub fn on_content_edited(&mut self) {
        self.sync_document();
        self.notify();
    }

    /// Recompute the format state after the selection moved.
    pub fn on_selection_changed(&mut self) {
        self.format_state = FormatState::query(&self.surface);
        trace!(state = %self.format_state, "Selection changed");
    }

    /// Apply a command by name.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for unknown names and missing or unsafe
    /// URL arguments. The document is untouched and nothing is emitted.
    pub fn apply_format(
        &mut self,
        name: &str,
        argument: Option<&str>,
    ) -> Result<FormatOutcome, CommandError> {
        let command = FormatCommand::parse(name, argument).inspect_err(|err| {
            debug!(%err, command = name, "Rejected formatting command");
        })?;
        self.apply(command)
    }

    /// Apply a typed command at the surface's selection.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command's URL argument is empty
    /// or unsafe.
    pub fn apply(&mut self, command: FormatCommand) -> Result<FormatOutcome, CommandError> {
        command.validate().inspect_err(|err| {
            debug!(%err, command = command.name(), "Rejected formatting command");
        })?;
        if self.surface.selection().is_none() {
            debug!(command = command.name(), "No selection, command ignored");
            return Ok(FormatOutcome::NoSelection);
        }
        let scope = perf::scope("editor.apply");
        self.surface.apply_command(&command);
        self.surface.focus();
        self.format_state = FormatState::query(&self.surface);
        self.sync_document();
        drop(scope);
        debug!(command = command.name(), state = %self.format_state, "Applied formatting command");
        perf::log_event(
            "editor.command",
            format!(
                "name={} state={} characters={}",
                command.name(),
                self.format_state,
                self.characters
            ),
        );
        self.notify();
        Ok(FormatOutcome::Applied)
    }

    /// Ask for a link URL and link the selection with it.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsafeUrl`] when the answer uses a disallowed
    /// scheme.
    pub fn request_link(
        &mut self,
        input: &mut dyn InputProvider,
    ) -> Result<FormatOutcome, CommandError> {
        self.request(input, PromptKind::Link)
    }

    /// Ask for an image URL and insert the image at the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsafeUrl`] when the answer uses a disallowed
    /// scheme.
    pub fn request_image(
        &mut self,
        input: &mut dyn InputProvider,
    ) -> Result<FormatOutcome, CommandError> {
        self.request(input, PromptKind::Image)
    }

    fn request(
        &mut self,
        input: &mut dyn InputProvider,
        kind: PromptKind,
    ) -> Result<FormatOutcome, CommandError> {
        let Some(url) = input
            .request(kind)
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
        else {
            debug!(?kind, "URL prompt cancelled");
            return Ok(FormatOutcome::Cancelled);
        };
        let command = match kind {
            PromptKind::Link => FormatCommand::CreateLink(url),
            PromptKind::Image => FormatCommand::InsertImage(url),
        };
        self.apply(command)
    }

    /// Step back through the surface's history.
    ///
    /// Returns `true` (and emits a change) if anything was restored.
    pub fn undo(&mut self) -> bool {
        let restored = self.surface.undo();
        if restored {
            self.after_history_step();
        }
        restored
    }

    /// Step forward through the surface's history.
    pub fn redo(&mut self) -> bool {
        let restored = self.surface.redo();
        if restored {
            self.after_history_step();
        }
        restored
    }

    fn after_history_step(&mut self) {
        self.format_state = FormatState::query(&self.surface);
        self.sync_document();
        self.notify();
    }

    fn sync_document(&mut self) {
        self.document = self.surface.markup();
        self.characters = character_count(&self.document);
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.document);
        }
    }

    /// Rendered characters in the document, markup excluded.
    ///
    /// Counted on the surface's content, so markup the surface drops on
    /// load (whitespace between blocks, script bodies) never counts.
    pub const fn character_count(&self) -> usize {
        self.characters
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether the placeholder should be drawn: no text and no images.
    pub fn placeholder_visible(&self) -> bool {
        self.characters == 0 && !self.surface.contains_image()
    }

    pub const fn format_state(&self) -> FormatState {
        self.format_state
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for routing raw input. Call
    /// [`Self::on_content_edited`] or [`Self::on_selection_changed`]
    /// afterwards.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: EditingSurface + Default> Default for EditableContentController<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: EditingSurface + std::fmt::Debug> std::fmt::Debug for EditableContentController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableContentController")
            .field("surface", &self.surface)
            .field("document", &self.document)
            .field("characters", &self.characters)
            .field("placeholder", &self.placeholder)
            .field("format_state", &self.format_state)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::editor::input::{CancelledInput, ProvidedInput};
    use crate::editor::surface::{Caret, Selection};
    use crate::markup::InlineStyle;

    /// Records commands and reports a scripted markup and style set.
    #[derive(Debug, Default)]
    struct FakeSurface {
        markup: String,
        selection: Option<Selection>,
        applied: Vec<FormatCommand>,
        bold: bool,
        focus_calls: usize,
    }

    impl EditingSurface for FakeSurface {
        fn load_markup(&mut self, markup: &str) {
            self.markup = markup.to_string();
            self.selection = None;
        }

        fn markup(&self) -> String {
            self.markup.clone()
        }

        fn selection(&self) -> Option<Selection> {
            self.selection
        }

        fn apply_command(&mut self, command: &FormatCommand) {
            if *command == FormatCommand::Bold {
                self.bold = !self.bold;
            }
            self.markup.push_str(&format!("[{}]", command.name()));
            self.applied.push(command.clone());
        }

        fn query_state(&self, style: InlineStyle) -> bool {
            style == InlineStyle::Bold && self.bold
        }

        fn focus(&mut self) {
            self.focus_calls += 1;
        }
    }

    fn controller() -> (EditableContentController<FakeSurface>, Rc<RefCell<Vec<String>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let controller = EditableContentController::new(FakeSurface::default())
            .with_listener(move |markup| sink.borrow_mut().push(markup.to_string()));
        (controller, changes)
    }

    fn with_caret(controller: &mut EditableContentController<FakeSurface>) {
        controller.surface_mut().selection = Some(Selection::caret(Caret::new(0, 0)));
    }

    #[test]
    fn test_initialize_counts_rendered_characters() {
        let (mut controller, changes) = controller();
        controller.initialize("<b>hi</b>", "type here");
        assert_eq!(controller.character_count(), 2);
        assert!(!controller.placeholder_visible());
        assert_eq!(controller.placeholder(), "type here");
        assert_eq!(controller.document(), "<b>hi</b>");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_empty_document_shows_placeholder_until_edit() {
        let (mut controller, changes) = controller();
        controller.initialize("", "type here");
        assert!(controller.placeholder_visible());

        controller.surface_mut().markup = "x".to_string();
        controller.on_content_edited();
        assert!(!controller.placeholder_visible());
        assert_eq!(*changes.borrow(), vec!["x".to_string()]);
    }

    #[test]
    fn test_image_only_document_hides_placeholder() {
        let (mut controller, _) = controller();
        controller.initialize(r#"<img src="a.png">"#, "type here");
        assert_eq!(controller.character_count(), 0);
        assert!(!controller.placeholder_visible());
    }

    #[test]
    fn test_commented_out_image_keeps_placeholder() {
        let (mut controller, _) = controller();
        controller.initialize("<!-- <img -->", "type here");
        assert_eq!(controller.character_count(), 0);
        assert!(controller.placeholder_visible());
    }

    #[test]
    fn test_initialize_keeps_value_verbatim_and_resets_state() {
        let (mut controller, _) = controller();
        with_caret(&mut controller);
        controller.apply(FormatCommand::Bold).unwrap();
        assert!(controller.format_state().bold);

        controller.initialize("<div>raw</div>", "");
        assert_eq!(controller.document(), "<div>raw</div>");
        assert_eq!(controller.format_state(), FormatState::default());
    }

    #[test]
    fn test_unsupported_command_fails_closed() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        with_caret(&mut controller);
        let result = controller.apply_format("scriptAlert", None);
        assert_eq!(
            result,
            Err(CommandError::Unsupported("scriptAlert".to_string()))
        );
        assert_eq!(controller.document(), "hello");
        assert!(controller.surface().applied.is_empty());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_apply_without_selection_does_nothing() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        assert_eq!(
            controller.apply_format("bold", None),
            Ok(FormatOutcome::NoSelection)
        );
        assert!(controller.surface().applied.is_empty());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_apply_emits_once_and_refocuses() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        with_caret(&mut controller);
        assert_eq!(
            controller.apply_format("italic", None),
            Ok(FormatOutcome::Applied)
        );
        assert_eq!(controller.document(), "hello[italic]");
        assert_eq!(*changes.borrow(), vec!["hello[italic]".to_string()]);
        assert_eq!(controller.surface().focus_calls, 1);
    }

    #[test]
    fn test_bold_toggles_format_state_each_call() {
        let (mut controller, _) = controller();
        controller.initialize("", "");
        with_caret(&mut controller);
        for expected in [true, false, true] {
            controller.apply(FormatCommand::Bold).unwrap();
            assert_eq!(controller.format_state().bold, expected);
        }
    }

    #[test]
    fn test_url_commands_require_argument() {
        let (mut controller, _) = controller();
        with_caret(&mut controller);
        assert_eq!(
            controller.apply_format("createLink", None),
            Err(CommandError::MissingArgument("createLink"))
        );
        assert_eq!(
            controller.apply_format("insertImage", Some("  ")),
            Err(CommandError::MissingArgument("insertImage"))
        );
    }

    #[test]
    fn test_request_link_with_empty_answer_is_cancelled() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        with_caret(&mut controller);
        let mut input = ProvidedInput::new("   ");
        assert_eq!(
            controller.request_link(&mut input),
            Ok(FormatOutcome::Cancelled)
        );
        assert_eq!(
            controller.request_link(&mut CancelledInput),
            Ok(FormatOutcome::Cancelled)
        );
        assert_eq!(controller.document(), "hello");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_request_image_applies_trimmed_url() {
        let (mut controller, changes) = controller();
        controller.initialize("", "");
        with_caret(&mut controller);
        let mut input = |kind: PromptKind| {
            assert_eq!(kind, PromptKind::Image);
            Some(" https://img.example/cat.png ".to_string())
        };
        assert_eq!(
            controller.request_image(&mut input),
            Ok(FormatOutcome::Applied)
        );
        assert_eq!(
            controller.surface().applied,
            vec![FormatCommand::InsertImage(
                "https://img.example/cat.png".to_string()
            )]
        );
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_request_link_rejects_script_urls() {
        let (mut controller, changes) = controller();
        with_caret(&mut controller);
        let mut input = ProvidedInput::new("javascript:alert(1)");
        assert!(matches!(
            controller.request_link(&mut input),
            Err(CommandError::UnsafeUrl(_))
        ));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_selection_change_updates_state_without_emitting() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        controller.surface_mut().bold = true;
        controller.on_selection_changed();
        assert!(controller.format_state().bold);
        assert_eq!(controller.document(), "hello");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_undo_without_history_is_noop() {
        let (mut controller, changes) = controller();
        controller.initialize("hello", "");
        assert!(!controller.undo());
        assert!(!controller.redo());
        assert!(changes.borrow().is_empty());
    }
}
