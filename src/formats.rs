//! Line classification shared between parsing and rendering.
//!
//! Section splitting and the styled document pane must agree on what a line
//! *is* (header, horizontal rule, list item, plain text), otherwise the
//! editable view and the exported artifact drift apart. This module owns the
//! classification vocabulary; the markdown rules live in [`markdown`].

pub mod markdown;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a single line of the document is, after classification.
pub enum LineKind {
    /// Whitespace-only line.
    Blank,
    /// ATX header with its depth (1-6).
    Header(u8),
    /// Thematic break (`---`, `***`, `___`).
    HorizontalRule,
    /// Numbered list item with its leading indent width.
    Ordered(usize),
    /// Bulleted list item with its leading indent width.
    Unordered(usize),
    /// Anything else.
    Text,
}
