use super::{AppState, SelectionState};
use crate::conversation::Role;
use crate::section::Section;
use std::fs;

const DOC: &str = "# Supply Agreement\n\nBetween the parties.\n\n## 1. Goods\n\nalpha\n\n## 2. Pricing\n\nbeta\n";

fn app() -> AppState {
    AppState::new(DOC.to_string(), 100)
}

#[test]
fn test_title_section_is_never_selectable() {
    let mut app = app();

    assert!(!app.select(0), "title section must be rejected");
    assert_eq!(app.selection_state, SelectionState::Unselected);
    assert!(!app.enter_edit());
    assert_eq!(app.document, DOC, "document untouched by rejected select");
}

#[test]
fn test_synthetic_section_is_never_selectable() {
    let mut app = AppState::new("no headers here, just prose\n".to_string(), 100);

    assert_eq!(app.sections.len(), 1);
    assert!(!app.select(0), "synthetic section must be rejected");
}

#[test]
fn test_selection_resets_when_section_count_shrinks() {
    let mut app = app();
    assert!(app.select(2));
    assert_eq!(app.selected_index, Some(2));

    app.set_document("# Only One Left\n\nbody\n".to_string());

    assert_eq!(app.selection_state, SelectionState::Unselected);
    assert_eq!(app.selected_index, None);
    assert!(app.current_section.is_none());
}

#[test]
fn test_selection_follows_title_across_reorder() {
    let mut app = app();
    assert!(app.select(2));

    // Same sections, different order: the title is the identity, not the index.
    app.set_document(
        "# Supply Agreement\n\nBetween the parties.\n\n## 2. Pricing\n\nbeta\n\n## 1. Goods\n\nalpha\n"
            .to_string(),
    );

    assert_eq!(app.selection_state, SelectionState::Selected);
    assert_eq!(app.selected_index, Some(1));
    assert_eq!(app.current_section.as_ref().unwrap().title, "1. Goods");
}

#[test]
fn test_append_delta_reparses_incrementally() {
    let mut app = AppState::new(String::new(), 100);
    assert!(app.sections.is_empty());

    app.append_delta("# Agreement\n\nfirst ");
    assert_eq!(app.sections.len(), 1);

    app.append_delta("clause\n\n## Scope\n\nwide\n");
    assert_eq!(app.sections.len(), 2);
    assert_eq!(app.sections[1].title, "Scope");
    assert_eq!(app.sections[0].body, "first clause");
}

#[test]
fn test_editing_suspended_while_streaming() {
    let mut app = app();
    app.begin_stream();

    assert!(app.select(1));
    assert!(!app.enter_edit(), "no drafts while deltas are arriving");

    app.end_stream();
    assert!(app.enter_edit());
}

#[test]
fn test_save_edit_splices_only_the_target() {
    let mut app = app();
    assert!(app.select(1));
    assert!(app.enter_edit());

    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("\nrevised goods clause\n");
    }
    app.save_edit();

    assert!(app.document.contains("revised goods clause"));
    assert!(!app.document.contains("alpha"));
    assert!(app.document.contains("## 1. Goods\n"), "header preserved");
    assert!(app.document.starts_with("# Supply Agreement\n"));
    assert!(app.document.contains("## 2. Pricing\n\nbeta\n"), "sibling untouched");
    assert_eq!(app.selection_state, SelectionState::Selected);
    assert_eq!(app.message.as_deref(), Some("Saved"));
}

#[test]
fn test_cancel_edit_discards_draft() {
    let mut app = app();
    assert!(app.select(1));
    assert!(app.enter_edit());

    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("\nnever committed\n");
    }
    app.cancel_edit();

    assert_eq!(app.document, DOC);
    assert_eq!(app.selection_state, SelectionState::Selected);
    assert!(app.editor_state.is_none());
}

#[test]
fn test_assistant_rewrite_targets_selected_section() {
    let mut app = app();
    assert!(app.select(2));

    assert!(app.apply_assistant_rewrite("cost plus five percent"));

    assert!(app.document.contains("## 2. Pricing\ncost plus five percent"));
    assert!(!app.document.contains("beta"));
    assert!(app.document.contains("## 1. Goods\n\nalpha\n"));
}

#[test]
fn test_span_selection_used_when_no_section_is_active() {
    let mut app = app();
    let start = app.document.find("alpha").unwrap();
    assert!(app.set_span_selection(start, start + "alpha".len()));
    assert_eq!(
        app.span_selection.as_ref().unwrap().section_title,
        "1. Goods"
    );

    assert!(app.apply_assistant_rewrite("ALPHA GOODS"));

    assert!(app.document.contains("## 1. Goods\n\nALPHA GOODS\n"));
    assert!(app.span_selection.is_none(), "span dies with the mutation");
}

#[test]
fn test_span_selection_rejects_bad_ranges() {
    let mut app = app();
    assert!(!app.set_span_selection(5, 5));
    assert!(!app.set_span_selection(0, app.document.len() + 10));
}

#[test]
fn test_rewrite_without_any_target_is_rejected() {
    let mut app = app();
    assert!(!app.apply_assistant_rewrite("nowhere to go"));
    assert_eq!(app.document, DOC);
}

#[test]
fn test_vanished_section_falls_back_to_literal_replacement() {
    let mut app = AppState::new("alpha beta gamma".to_string(), 100);
    // A snapshot from a parse that no longer exists anywhere in the text.
    app.current_section = Some(Section {
        title: "Gone".to_string(),
        level: 2,
        body: "beta".to_string(),
        byte_start: 0,
        byte_end: 0,
    });

    assert!(app.apply_assistant_rewrite("BETA"));
    assert_eq!(app.document, "alpha BETA gamma");
}

#[test]
fn test_chat_topic_follows_selection() {
    let mut app = app();
    assert_eq!(app.current_topic(), "general");

    app.record_turn(Role::User, "what law governs this?");
    assert_eq!(app.conversations.history("general").len(), 1);

    assert!(app.select(2));
    assert_eq!(app.current_topic(), "2. Pricing");
    app.record_turn(Role::User, "make it firmer");
    assert_eq!(app.conversations.history("2. Pricing").len(), 1);
}

#[test]
fn test_export_writes_document_text() {
    let app = app();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.md");

    app.export(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
}
