//! The core state machine bridging the contract text and the interactive editor.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated
//! as the user navigates and edits. Here that truth is the full document
//! text: every mutation (a streamed delta, a saved draft, an assistant
//! rewrite) produces a new text value which is immediately re-parsed into
//! sections, so nothing in the application ever consults offsets computed
//! against an older text.

use crate::conversation::{ConversationStore, Role, GENERAL_TOPIC};
use crate::section::{parse_sections, Section};
use crate::splice::{splice, SpliceRequest, SpliceTarget};
use edtui::{EditorState, Lines};
use std::io;
use std::path::Path;
use std::{fs, mem};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Tracks the lifecycle of the section a user is working on.
///
/// Selection proceeds through distinct states so that a draft can never be
/// committed against offsets captured before the document changed. The state
/// machine is:
///
/// ```text
/// Unselected -> Selected -> Editing
///      ^           ^ |         |
///      |           |_|_________|
///      |             |  (save / cancel)
///      |_____________|
///        (section no longer matched after a re-parse)
/// ```
///
/// # State Transitions
///
/// - **Unselected → Selected**: the user activates a section that is neither
///   the title section nor synthetic.
/// - **Selected → Editing**: the user opens the draft editor on the selected
///   section. Rejected while a stream is appending to the document.
/// - **Editing → Selected**: save (commits the draft through a splice,
///   re-resolved by title against the fresh parse) or cancel (discards the
///   draft without touching the document).
/// - **any → Unselected**: after a re-parse, the selected title can no
///   longer be matched. Self-healing, never an error.
pub enum SelectionState {
    /// No section is active; navigation only.
    Unselected,
    /// A section is active and snapshotted; chat targets it.
    Selected,
    /// The active section's body is open in the draft editor.
    Editing,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Section list beside the rendered document.
    List,
    /// Draft editor over the active section's body.
    Detail,
    /// Transcript and input line for the active section's assistant chat.
    Chat,
    /// Captures vim-style command input after ':' is pressed.
    Command,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A free-text span the user highlighted inside rendered content, recorded as
/// absolute offsets plus the owning section's title. Lower priority than a
/// section selection and invalidated by any document mutation.
pub struct SpanSelection {
    /// First byte of the highlighted span.
    pub start: usize,
    /// Byte immediately after the highlighted span.
    pub end: usize,
    /// Title of the section the span falls inside.
    pub section_title: String,
}

/// Owns the canonical document text and everything derived from it.
///
/// Sections, the selection snapshot, and the span selection are all
/// recomputed or revalidated on every mutation; callers never reuse a numeric
/// index across renders, only titles.
pub struct AppState {
    /// The full contract text. Only mutated through methods that re-parse.
    pub document: String,
    /// Sections of the current parse, in document order.
    pub sections: Vec<Section>,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// View the command line returns to on completion.
    pub command_return: View,
    /// List cursor; moves freely over all sections.
    pub cursor_index: usize,
    /// Lifecycle of the active section.
    pub selection_state: SelectionState,
    /// Index of the active section in the current parse, when matched.
    pub selected_index: Option<usize>,
    /// Copy of the active section taken at selection time, re-matched by
    /// title against the fresh parse before every splice.
    pub current_section: Option<Section>,
    /// Draft buffer while the detail view is active.
    pub editor_state: Option<EditorState>,
    /// Highlighted free-text span, if any.
    pub span_selection: Option<SpanSelection>,
    /// Per-section assistant transcripts.
    pub conversations: ConversationStore,
    /// Chat input line under construction.
    pub chat_input: String,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Maximum line width for text wrapping in the editor.
    pub wrap_width: usize,
    /// True while a generation stream is appending to the document; draft
    /// editing is suspended until it finishes.
    pub streaming: bool,
}

impl AppState {
    #[must_use]
    /// Initialises application state around an initial document text.
    pub fn new(document: String, wrap_width: usize) -> Self {
        let sections = parse_sections(&document);
        Self {
            document,
            sections,
            current_view: View::List,
            command_return: View::List,
            cursor_index: 0,
            selection_state: SelectionState::Unselected,
            selected_index: None,
            current_section: None,
            editor_state: None,
            span_selection: None,
            conversations: ConversationStore::new(),
            chat_input: String::new(),
            command_buffer: String::new(),
            message: None,
            wrap_width,
            streaming: false,
        }
    }

    /// Replaces the document wholesale and re-derives everything from it.
    pub fn set_document(&mut self, text: String) {
        self.document = text;
        self.refresh();
    }

    /// Appends one streamed delta and re-derives everything.
    pub fn append_delta(&mut self, delta: &str) {
        self.document.push_str(delta);
        self.refresh();
    }

    /// Marks a generation stream as active, suspending draft editing.
    pub fn begin_stream(&mut self) {
        self.streaming = true;
        self.message = Some("Drafting...".to_string());
    }

    /// Marks the stream finished; the document (complete or partial) is now
    /// editable.
    pub fn end_stream(&mut self) {
        self.streaming = false;
        self.message = Some("Draft complete".to_string());
    }

    /// Re-parses the document and revalidates all derived state. Offsets
    /// recorded before this call are dead.
    fn refresh(&mut self) {
        self.sections = parse_sections(&self.document);
        self.span_selection = None;
        if !self.sections.is_empty() {
            self.cursor_index = self.cursor_index.min(self.sections.len() - 1);
        }
        self.revalidate_selection();
    }

    /// Re-matches the selection snapshot against the fresh parse by title.
    /// An unmatched selection silently reverts to `Unselected`.
    fn revalidate_selection(&mut self) {
        let Some(snapshot) = self.current_section.as_ref() else {
            return;
        };
        let title = snapshot.title.clone();
        match self.sections.iter().position(|s| s.title == title) {
            Some(index) => {
                self.selected_index = Some(index);
                self.current_section = Some(self.sections[index].clone());
            }
            None => {
                self.deselect();
            }
        }
    }

    #[must_use]
    /// Whether a section may be selected or edited. The title section (index
    /// 0) and synthetic sections are read-only context, never targets.
    pub fn is_selectable(&self, index: usize) -> bool {
        index > 0 && index < self.sections.len() && self.sections[index].level > 0
    }

    /// Activates a section, snapshotting it for later splices. A
    /// non-selectable target leaves state untouched.
    pub fn select(&mut self, index: usize) -> bool {
        if self.selection_state == SelectionState::Editing || !self.is_selectable(index) {
            return false;
        }
        self.selected_index = Some(index);
        self.current_section = Some(self.sections[index].clone());
        self.selection_state = SelectionState::Selected;
        true
    }

    /// Clears the selection and any draft.
    pub fn deselect(&mut self) {
        self.selection_state = SelectionState::Unselected;
        self.selected_index = None;
        self.current_section = None;
        self.editor_state = None;
    }

    /// Records a highlighted span, resolving its owning section from the
    /// current parse. Rejects ranges that do not fall inside the document.
    pub fn set_span_selection(&mut self, start: usize, end: usize) -> bool {
        if start >= end || self.document.get(start..end).is_none() {
            return false;
        }
        let owner = self
            .sections
            .iter()
            .find(|s| s.byte_start <= start && start < s.byte_end);
        let Some(owner) = owner else {
            return false;
        };
        self.span_selection = Some(SpanSelection {
            start,
            end,
            section_title: owner.title.clone(),
        });
        true
    }

    /// Opens the draft editor on the selected section's current body.
    ///
    /// Rejected while a stream is appending: the body being edited would
    /// otherwise race the parse it came from.
    pub fn enter_edit(&mut self) -> bool {
        if self.streaming {
            self.message = Some("Drafting in progress".to_string());
            return false;
        }
        if self.selection_state != SelectionState::Selected {
            return false;
        }
        let Some(section) = self.current_section.as_ref() else {
            return false;
        };

        let body = if section.body.trim().is_empty() {
            "\n".to_string()
        } else {
            format!("\n{}\n", section.body.trim())
        };
        self.editor_state = Some(EditorState::new(Lines::from(body.as_str())));
        self.selection_state = SelectionState::Editing;
        self.current_view = View::Detail;
        true
    }

    /// Discards the draft without touching the document.
    pub fn cancel_edit(&mut self) {
        self.editor_state = None;
        if self.selection_state == SelectionState::Editing {
            self.selection_state = SelectionState::Selected;
        }
        self.current_view = View::List;
    }

    /// Commits the draft through a splice and returns to the section list.
    ///
    /// The target is re-located in the *current* parse by title; the offsets
    /// captured when editing began are never reused.
    pub fn save_edit(&mut self) {
        let Some(draft) = self.editor_text() else {
            return;
        };
        if self.commit_body(&draft) {
            self.message = Some("Saved".to_string());
        }
        self.editor_state = None;
        if self.selection_state == SelectionState::Editing {
            self.selection_state = SelectionState::Selected;
        }
        self.current_view = View::List;
    }

    /// Splices an assistant-produced replacement body into the active target.
    ///
    /// Routed exactly like a manual save so both paths share the fallback
    /// ladder; returns false when nothing is targeted.
    pub fn apply_assistant_rewrite(&mut self, new_body: &str) -> bool {
        if self.current_section.is_some() {
            return self.commit_body(new_body);
        }
        if let Some(span) = self.span_selection.take() {
            let request = SpliceRequest {
                target: SpliceTarget::Range {
                    start: span.start,
                    end: span.end,
                },
                replacement: new_body.to_string(),
            };
            let next = splice(&self.document, &request);
            self.set_document(next);
            return true;
        }
        false
    }

    /// Replaces the active section's body, degrading from the fresh parse's
    /// section, to the recorded span, to a literal match on the stale body.
    fn commit_body(&mut self, replacement: &str) -> bool {
        let Some(snapshot) = self.current_section.clone() else {
            return false;
        };
        let target = if let Some(fresh) = self
            .sections
            .iter()
            .find(|s| s.title == snapshot.title)
        {
            SpliceTarget::Section(fresh.clone())
        } else if let Some(span) = self.span_selection.take() {
            SpliceTarget::Range {
                start: span.start,
                end: span.end,
            }
        } else {
            // Last resort; may hit an unrelated occurrence of the old body.
            log::warn!(
                "section '{}' not found in current parse, falling back to literal replacement",
                snapshot.title
            );
            SpliceTarget::Literal {
                old: snapshot.body.clone(),
            }
        };
        let request = SpliceRequest {
            target,
            replacement: replacement.to_string(),
        };
        let next = splice(&self.document, &request);
        self.set_document(next);
        true
    }

    /// Extracts the draft text from the editor buffer.
    fn editor_text(&self) -> Option<String> {
        let editor_state = self.editor_state.as_ref()?;
        let lines: Vec<String> = editor_state
            .lines
            .iter_row()
            .map(|line| line.iter().collect::<String>())
            .collect();
        Some(lines.join("\n"))
    }

    #[must_use]
    /// Conversation topic for the current target: the selected section's
    /// title, or the general document-level transcript.
    pub fn current_topic(&self) -> String {
        self.current_section
            .as_ref()
            .map_or_else(|| GENERAL_TOPIC.to_string(), |s| s.title.clone())
    }

    /// Appends a turn to the current topic's transcript.
    pub fn record_turn(&mut self, role: Role, content: &str) {
        let topic = self.current_topic();
        self.conversations.push(&topic, role, content);
    }

    /// Takes the chat input line, leaving it empty.
    pub fn take_chat_input(&mut self) -> String {
        mem::take(&mut self.chat_input)
    }

    #[must_use]
    /// The following section index for sequential navigation.
    pub fn find_next_section(&self) -> Option<usize> {
        if self.cursor_index + 1 < self.sections.len() {
            Some(self.cursor_index + 1)
        } else {
            None
        }
    }

    #[must_use]
    /// The preceding section index for reverse navigation.
    pub fn find_prev_section(&self) -> Option<usize> {
        if self.cursor_index > 0 {
            Some(self.cursor_index - 1)
        } else {
            None
        }
    }

    /// Writes the document text to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.document)
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
