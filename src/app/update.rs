use crate::app::{Model, ToastLevel};
use crate::app::model::UrlPrompt;
use crate::editor::{
    CancelledInput, Caret, EditingSurface, FormatOutcome, Motion, PromptKind, ProvidedInput,
    Selection,
};
use crate::ui::ToolbarAction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character at the caret
    Insert(char),
    /// Insert pasted text
    Paste(String),
    /// Split the block at the caret (Enter)
    NewLine,
    /// Delete before the caret (Backspace)
    DeleteBack,
    /// Delete after the caret (Delete)
    DeleteForward,
    /// Move the caret, extending the selection when the flag is set
    Move(Motion, bool),
    /// Select the whole document
    SelectAll,
    /// Place the caret (or extend the selection) at a position, e.g. from a click
    PointAt(Caret, bool),
    /// Press a toolbar button
    Toolbar(ToolbarAction),
    /// Undo the last edit
    Undo,
    /// Redo the last undone edit
    Redo,

    // URL prompt
    /// Append text to the prompt
    PromptInput(String),
    /// Delete the last prompt character
    PromptBackspace,
    /// Confirm the prompt
    PromptSubmit,
    /// Dismiss the prompt
    PromptCancel,

    // Output
    /// Copy the current markup to the clipboard
    CopyMarkup,
    /// Write the current markup to the output target now
    EmitSnapshot,

    // View
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Scroll the editor up by n rows
    ScrollUp(usize),
    /// Scroll the editor down by n rows
    ScrollDown(usize),
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit, writing the final markup
    Quit,
    /// Quit without writing the final markup
    Discard,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Terminal and file output happen in the app's side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset confirmation on any action other than the confirmed one.
    if !matches!(msg, Message::Discard) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::Insert(ch) => {
            if model.editor.surface_mut().insert_char(ch) {
                content_edited(&mut model);
            }
        }
        Message::Paste(text) => {
            if model.editor.surface_mut().insert_text(&text) {
                content_edited(&mut model);
            }
        }
        Message::NewLine => {
            if model.editor.surface_mut().split_block() {
                content_edited(&mut model);
            }
        }
        Message::DeleteBack => {
            if model.editor.surface_mut().delete_back() {
                content_edited(&mut model);
            }
        }
        Message::DeleteForward => {
            if model.editor.surface_mut().delete_forward() {
                content_edited(&mut model);
            }
        }
        Message::Move(motion, extend) => {
            model.editor.surface_mut().move_caret(motion, extend);
            selection_changed(&mut model);
        }
        Message::SelectAll => {
            model.editor.surface_mut().select_all();
            selection_changed(&mut model);
        }
        Message::PointAt(caret, extend) => {
            let surface = model.editor.surface_mut();
            match surface.selection() {
                Some(current) if extend => {
                    surface.set_selection(Selection::range(current.anchor, caret));
                }
                _ => surface.set_caret(caret),
            }
            selection_changed(&mut model);
        }
        Message::Toolbar(action) => {
            if let Some(kind) = action.prompt() {
                model.prompt = Some(UrlPrompt::new(kind));
            } else if let Some(command) = action.command() {
                let result = model.editor.apply(command);
                report_outcome(&mut model, result);
            }
        }
        Message::Undo => {
            if model.editor.undo() {
                model.ensure_caret_visible();
            } else {
                model.show_toast(ToastLevel::Info, "Nothing to undo");
            }
        }
        Message::Redo => {
            if model.editor.redo() {
                model.ensure_caret_visible();
            } else {
                model.show_toast(ToastLevel::Info, "Nothing to redo");
            }
        }

        // URL prompt
        Message::PromptInput(text) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.extend(text.chars().filter(|c| !c.is_control()));
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => {
            if let Some(prompt) = model.prompt.take() {
                let mut input = ProvidedInput::new(prompt.input);
                let result = match prompt.kind {
                    PromptKind::Link => model.editor.request_link(&mut input),
                    PromptKind::Image => model.editor.request_image(&mut input),
                };
                report_outcome(&mut model, result);
            }
        }
        Message::PromptCancel => {
            if let Some(prompt) = model.prompt.take() {
                let result = match prompt.kind {
                    PromptKind::Link => model.editor.request_link(&mut CancelledInput),
                    PromptKind::Image => model.editor.request_image(&mut CancelledInput),
                };
                report_outcome(&mut model, result);
            }
        }

        // Output is handled as a side effect
        Message::CopyMarkup | Message::EmitSnapshot => {}

        // View
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = (model.scroll_offset + n).min(model.max_scroll_offset());
        }
        Message::Resize(width, height) => {
            model.size = (width, height);
            model.scroll_offset = model.scroll_offset.min(model.max_scroll_offset());
            model.ensure_caret_visible();
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
        Message::Discard => {
            if model.is_modified() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Esc again to discard, or Ctrl+Q to quit and keep them",
                );
                model.quit_confirmed = true;
            } else {
                model.discard = true;
                model.should_quit = true;
            }
        }
    }
    model
}

fn content_edited(model: &mut Model) {
    model.editor.on_content_edited();
    model.editor.on_selection_changed();
    model.ensure_caret_visible();
}

fn selection_changed(model: &mut Model) {
    model.editor.on_selection_changed();
    model.ensure_caret_visible();
}

fn report_outcome(
    model: &mut Model,
    result: Result<FormatOutcome, crate::editor::CommandError>,
) {
    match result {
        Ok(FormatOutcome::Applied) => model.ensure_caret_visible(),
        Ok(FormatOutcome::NoSelection) => {
            model.show_toast(ToastLevel::Info, "Place the caret in the editor first");
        }
        Ok(FormatOutcome::Cancelled) => model.show_toast(ToastLevel::Info, "Cancelled"),
        Err(err) => {
            tracing::warn!(%err, "Formatting command refused");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}
