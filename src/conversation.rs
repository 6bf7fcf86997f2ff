//! Per-section assistant transcripts.
//!
//! One session owns one store; components that need history receive it by
//! reference. Transcripts are keyed by section title, with a sentinel topic
//! for document-level chat. Two sections sharing a title collapse into one
//! transcript; contract headings are numbered in practice, so titles are
//! assumed locally unique.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Topic used when no section is selected.
pub const GENERAL_TOPIC: &str = "general";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Who produced a turn.
pub enum Role {
    /// The person driving the editor.
    User,
    /// The drafting backend.
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One message in a transcript.
pub struct Turn {
    /// Who produced it.
    pub role: Role,
    /// The message text.
    pub content: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// Ordered transcripts keyed by section title (or [`GENERAL_TOPIC`]).
pub struct ConversationStore {
    topics: HashMap<String, Vec<Turn>>,
}

impl ConversationStore {
    #[must_use]
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to a topic's transcript, creating the topic on first
    /// use.
    pub fn push(&mut self, topic: &str, role: Role, content: impl Into<String>) {
        self.topics.entry(topic.to_string()).or_default().push(Turn {
            role,
            content: content.into(),
        });
    }

    #[must_use]
    /// The transcript for a topic, oldest first. Empty for unknown topics.
    pub fn history(&self, topic: &str) -> &[Turn] {
        self.topics.get(topic).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    /// True when no topic has any turns.
    pub fn is_empty(&self) -> bool {
        self.topics.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
#[path = "tests/conversation.rs"]
mod tests;
