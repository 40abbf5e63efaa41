use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::editor::{Caret, EditingSurface, Motion, PromptKind};
use crate::ui::ToolbarAction;

use super::event_loop::ResizeDebouncer;
use super::{App, Message, Model, ToastLevel, update};

fn create_test_model(value: &str) -> Model {
    Model::new(value, "请输入内容...", (80, 24))
}

fn apply_all(model: Model, messages: impl IntoIterator<Item = Message>) -> Model {
    messages.into_iter().fold(model, update)
}

fn type_text(model: Model, text: &str) -> Model {
    apply_all(model, text.chars().map(Message::Insert))
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// --- Editing ---

#[test]
fn test_new_model_places_caret_at_end() {
    let model = create_test_model("hello");
    let selection = model.editor.surface().selection().unwrap();
    assert_eq!(selection.head, Caret::new(0, 5));
    assert!(!model.is_modified());
}

#[test]
fn test_typing_updates_document_and_count() {
    let model = create_test_model("");
    assert!(model.editor.placeholder_visible());

    let model = type_text(model, "hi");
    assert_eq!(model.editor.document(), "hi");
    assert_eq!(model.editor.character_count(), 2);
    assert!(!model.editor.placeholder_visible());
    assert_eq!(model.changes.borrow().count, 2);
    assert_eq!(model.changes.borrow().latest.as_deref(), Some("hi"));
}

#[test]
fn test_enter_splits_into_paragraphs() {
    let model = type_text(create_test_model(""), "a");
    let model = update(model, Message::NewLine);
    let model = type_text(model, "b");
    assert_eq!(model.editor.document(), "<p>a</p><p>b</p>");
}

#[test]
fn test_backspace_at_document_start_emits_nothing() {
    let model = create_test_model("x");
    let model = update(model, Message::Move(Motion::DocumentStart, false));
    let model = update(model, Message::DeleteBack);
    assert_eq!(model.changes.borrow().count, 0);
    assert_eq!(model.editor.document(), "x");
}

#[test]
fn test_paste_inserts_multiple_blocks() {
    let model = update(create_test_model(""), Message::Paste("one\ntwo".to_string()));
    assert_eq!(model.editor.document(), "<p>one</p><p>two</p>");
    assert_eq!(model.changes.borrow().count, 1);
}

#[test]
fn test_empty_paste_emits_nothing_and_keeps_model_clean() {
    let model = update(create_test_model("hi"), Message::Paste(String::new()));
    let model = update(model, Message::Paste("\r".to_string()));
    assert_eq!(model.changes.borrow().count, 0);
    assert!(!model.is_modified());
    assert_eq!(model.editor.document(), "hi");

    let model = update(model, Message::Discard);
    assert!(model.should_quit);
}

#[test]
fn test_undo_and_redo_emit_changes() {
    let model = type_text(create_test_model(""), "ab");
    let model = update(model, Message::Undo);
    assert_eq!(model.editor.document(), "");
    let model = update(model, Message::Redo);
    assert_eq!(model.editor.document(), "ab");
    assert_eq!(model.changes.borrow().count, 4);
}

#[test]
fn test_undo_with_empty_history_shows_toast() {
    let model = update(create_test_model("x"), Message::Undo);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
    assert_eq!(model.changes.borrow().count, 0);
}

// --- Formatting ---

#[test]
fn test_select_all_then_bold() {
    let model = apply_all(
        create_test_model("hello"),
        [Message::SelectAll, Message::Toolbar(ToolbarAction::Bold)],
    );
    assert_eq!(model.editor.document(), "<b>hello</b>");
    assert!(model.editor.format_state().bold);
    assert_eq!(model.changes.borrow().count, 1);
}

#[test]
fn test_bold_at_caret_styles_next_typing() {
    let model = update(create_test_model("a"), Message::Toolbar(ToolbarAction::Bold));
    assert!(model.editor.format_state().bold);
    let model = type_text(model, "b");
    assert_eq!(model.editor.document(), "a<b>b</b>");
}

#[test]
fn test_moving_caret_refreshes_format_state() {
    let model = create_test_model("<i>it</i> plain");
    assert!(!model.editor.format_state().italic);
    let model = update(model, Message::PointAt(Caret::new(0, 1), false));
    assert!(model.editor.format_state().italic);
}

#[test]
fn test_list_buttons_toggle_current_block() {
    let model = update(create_test_model("item"), Message::Toolbar(ToolbarAction::BulletList));
    assert_eq!(model.editor.document(), "<ul><li>item</li></ul>");
    let model = update(model, Message::Toolbar(ToolbarAction::NumberedList));
    assert_eq!(model.editor.document(), "<ol><li>item</li></ol>");
}

// --- URL prompt ---

#[test]
fn test_link_prompt_links_selection() {
    let model = apply_all(
        create_test_model("see this"),
        [
            Message::PointAt(Caret::new(0, 4), false),
            Message::PointAt(Caret::new(0, 8), true),
            Message::Toolbar(ToolbarAction::Link),
        ],
    );
    assert_eq!(model.prompt.as_ref().map(|p| p.kind), Some(PromptKind::Link));
    assert_eq!(model.changes.borrow().count, 0);

    let model = apply_all(
        model,
        [
            Message::PromptInput("https://x.io".to_string()),
            Message::PromptSubmit,
        ],
    );
    assert!(model.prompt.is_none());
    assert_eq!(
        model.editor.document(),
        r#"see <a href="https://x.io">this</a>"#
    );
    assert_eq!(model.changes.borrow().count, 1);
}

#[test]
fn test_image_prompt_inserts_image() {
    let model = apply_all(
        create_test_model("x"),
        [
            Message::Toolbar(ToolbarAction::Image),
            Message::PromptInput("cat.png".to_string()),
            Message::PromptSubmit,
        ],
    );
    assert_eq!(model.editor.document(), r#"x<img src="cat.png">"#);
    assert_eq!(model.editor.character_count(), 1);
}

#[test]
fn test_empty_prompt_answer_is_cancelled() {
    let model = apply_all(
        create_test_model("hello"),
        [
            Message::Toolbar(ToolbarAction::Link),
            Message::PromptInput("   ".to_string()),
            Message::PromptSubmit,
        ],
    );
    assert_eq!(model.editor.document(), "hello");
    assert_eq!(model.changes.borrow().count, 0);
    assert_eq!(model.active_toast(), Some(("Cancelled", ToastLevel::Info)));
}

#[test]
fn test_prompt_cancel_leaves_document() {
    let model = apply_all(
        create_test_model("hello"),
        [
            Message::Toolbar(ToolbarAction::Image),
            Message::PromptInput("a.png".to_string()),
            Message::PromptCancel,
        ],
    );
    assert!(model.prompt.is_none());
    assert_eq!(model.editor.document(), "hello");
    assert_eq!(model.changes.borrow().count, 0);
}

#[test]
fn test_prompt_backspace_edits_input() {
    let model = apply_all(
        create_test_model(""),
        [
            Message::Toolbar(ToolbarAction::Link),
            Message::PromptInput("ab".to_string()),
            Message::PromptBackspace,
        ],
    );
    assert_eq!(model.prompt.map(|p| p.input), Some("a".to_string()));
}

#[test]
fn test_unsafe_url_is_refused_with_error_toast() {
    let model = apply_all(
        create_test_model("hello"),
        [
            Message::SelectAll,
            Message::Toolbar(ToolbarAction::Link),
            Message::PromptInput("javascript:alert(1)".to_string()),
            Message::PromptSubmit,
        ],
    );
    assert_eq!(model.editor.document(), "hello");
    assert_eq!(model.changes.borrow().count, 0);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));
}

// --- Quitting ---

#[test]
fn test_quit_reports_initial_value_when_unchanged() {
    let model = update(create_test_model("<div>raw</div>"), Message::Quit);
    assert!(model.should_quit);
    let report = App::finish(&model).unwrap();
    assert_eq!(report.markup, "<div>raw</div>");
    assert_eq!(report.characters, 3);
    assert_eq!(report.changes, 0);
}

#[test]
fn test_report_count_matches_counter_across_formatting() {
    let model = create_test_model("<p>a</p>\n<p>b</p>");
    assert_eq!(model.editor.character_count(), 2);
    assert_eq!(App::finish(&model).unwrap().characters, 2);

    let model = apply_all(
        model,
        [Message::SelectAll, Message::Toolbar(ToolbarAction::Bold)],
    );
    assert_eq!(model.editor.document(), "<p><b>a</b></p><p><b>b</b></p>");
    assert_eq!(model.editor.character_count(), 2);
    assert_eq!(App::finish(&model).unwrap().characters, 2);
}

#[test]
fn test_quit_reports_latest_change() {
    let model = type_text(create_test_model(""), "ok");
    let model = update(model, Message::Quit);
    let report = App::finish(&model).unwrap();
    assert_eq!(report.markup, "ok");
    assert_eq!(report.changes, 2);
}

#[test]
fn test_discard_requires_second_press_when_modified() {
    let model = type_text(create_test_model(""), "x");
    let model = update(model, Message::Discard);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));

    let model = update(model, Message::Discard);
    assert!(model.should_quit);
    assert!(App::finish(&model).is_none());
}

#[test]
fn test_other_message_resets_discard_confirmation() {
    let model = type_text(create_test_model(""), "x");
    let model = update(model, Message::Discard);
    let model = update(model, Message::Move(Motion::Left, false));
    assert!(!model.quit_confirmed);
    let model = update(model, Message::Discard);
    assert!(!model.should_quit);
}

#[test]
fn test_discard_unmodified_quits_immediately() {
    let model = update(create_test_model("x"), Message::Discard);
    assert!(model.should_quit);
    assert!(model.discard);
}

// --- View ---

#[test]
fn test_scroll_is_clamped_to_content() {
    let model = create_test_model("short");
    let model = update(model, Message::ScrollDown(10));
    assert_eq!(model.scroll_offset, 0);
}

#[test]
fn test_caret_stays_visible_while_typing_lines() {
    let mut model = Model::new("", "", (40, 10));
    for _ in 0..20 {
        model = update(model, Message::NewLine);
    }
    let height = usize::from(model.editor_text_area().height);
    assert!(model.scroll_offset > 0);
    assert_eq!(model.scroll_offset, 20 + 1 - height);
}

#[test]
fn test_resize_updates_size() {
    let model = update(create_test_model("x"), Message::Resize(100, 30));
    assert_eq!(model.size, (100, 30));
}

// --- Input mapping ---

#[test]
fn test_formatting_shortcuts() {
    let model = create_test_model("");
    let cases = [
        (key(KeyCode::Char('b'), KeyModifiers::CONTROL), ToolbarAction::Bold),
        (key(KeyCode::Char('i'), KeyModifiers::CONTROL), ToolbarAction::Italic),
        (key(KeyCode::Char('u'), KeyModifiers::CONTROL), ToolbarAction::Underline),
        (key(KeyCode::Char('l'), KeyModifiers::CONTROL), ToolbarAction::Link),
        (key(KeyCode::Char('g'), KeyModifiers::CONTROL), ToolbarAction::Image),
        (key(KeyCode::Char('4'), KeyModifiers::CONTROL), ToolbarAction::ClearFormat),
        (key(KeyCode::Char('8'), KeyModifiers::ALT), ToolbarAction::BulletList),
        (key(KeyCode::Char('7'), KeyModifiers::ALT), ToolbarAction::NumberedList),
    ];
    for (event, action) in cases {
        assert_eq!(App::handle_key(event, &model), Some(Message::Toolbar(action)));
    }
}

#[test]
fn test_editing_keys() {
    let model = create_test_model("");
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::Insert('x'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('X'), KeyModifiers::SHIFT), &model),
        Some(Message::Insert('X'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Left, KeyModifiers::SHIFT), &model),
        Some(Message::Move(Motion::Left, true))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Right, KeyModifiers::CONTROL), &model),
        Some(Message::Move(Motion::WordRight, false))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('z'), KeyModifiers::CONTROL), &model),
        Some(Message::Undo)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::Discard)
    );
}

#[test]
fn test_prompt_captures_keys() {
    let model = update(create_test_model(""), Message::Toolbar(ToolbarAction::Link));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('b'), KeyModifiers::NONE), &model),
        Some(Message::PromptInput("b".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('b'), KeyModifiers::CONTROL), &model),
        None
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::PromptSubmit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::PromptCancel)
    );
}

#[test]
fn test_help_closes_on_any_key() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert!(model.help_visible);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_paste_event_routes_to_prompt_when_open() {
    let mut debouncer = ResizeDebouncer::new(100);
    let paste = Event::Paste("https://x.io".to_string());

    let model = create_test_model("");
    assert_eq!(
        App::handle_event(&paste, &model, 0, &mut debouncer),
        Some(Message::Paste("https://x.io".to_string()))
    );

    let model = update(model, Message::Toolbar(ToolbarAction::Link));
    assert_eq!(
        App::handle_event(&paste, &model, 0, &mut debouncer),
        Some(Message::PromptInput("https://x.io".to_string()))
    );
}

#[test]
fn test_resize_event_is_debounced() {
    let mut debouncer = ResizeDebouncer::new(100);
    let model = create_test_model("");
    assert_eq!(
        App::handle_event(&Event::Resize(120, 40), &model, 5, &mut debouncer),
        None
    );
    assert_eq!(debouncer.take_ready(105), Some((120, 40)));
}

#[test]
fn test_click_on_toolbar_presses_button() {
    let model = create_test_model("");
    assert_eq!(
        App::handle_mouse(click(1, 0), &model),
        Some(Message::Toolbar(ToolbarAction::Bold))
    );
    assert_eq!(App::handle_mouse(click(3, 0), &model), None);
}

#[test]
fn test_click_in_editor_places_caret() {
    let model = create_test_model("hello");
    let area = model.editor_text_area();
    assert_eq!(
        App::handle_mouse(click(area.x + 3, area.y), &model),
        Some(Message::PointAt(Caret::new(0, 3), false))
    );
}

#[test]
fn test_drag_extends_selection() {
    let model = create_test_model("hello");
    let area = model.editor_text_area();
    let drag = MouseEvent {
        kind: MouseEventKind::Drag(MouseButton::Left),
        column: area.x + 2,
        row: area.y,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(drag, &model),
        Some(Message::PointAt(Caret::new(0, 2), true))
    );
}
