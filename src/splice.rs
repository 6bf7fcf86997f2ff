//! Targeted body replacement that never touches a section's header line.
//!
//! A splice is expressed as a plain request value rather than a callback, so
//! the caller decides the target against the freshest parse and nothing holds
//! offsets across renders. Three targets exist and are tried exclusively, in
//! declining order of precision: a section snapshot, a raw byte range, and a
//! first-occurrence literal match.

use crate::formats::markdown::header_line;
use crate::section::Section;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Where a replacement lands in the document.
pub enum SpliceTarget {
    /// Replace the body of this section, keeping its header line verbatim.
    /// The snapshot should come from the current parse; stale offsets are
    /// clamped, not trusted.
    Section(Section),
    /// Replace an absolute byte range directly. Used for free-text span
    /// selections with no enclosing header context.
    Range {
        /// First byte of the span to replace.
        start: usize,
        /// Byte immediately after the span to replace.
        end: usize,
    },
    /// Replace the first occurrence of a literal string. Best effort: if the
    /// text is not unique this may hit an unrelated occurrence, which is
    /// accepted rather than detected.
    Literal {
        /// The exact text to search for.
        old: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A single replacement, carried as a value from the UI or the assistant to
/// the document owner.
pub struct SpliceRequest {
    /// Where the replacement lands.
    pub target: SpliceTarget,
    /// The new text. Trimmed before insertion for section targets; inserted
    /// verbatim for range and literal targets.
    pub replacement: String,
}

/// Produces a new document text with only the request's target replaced.
///
/// An unresolvable target (a range that is not on character boundaries, a
/// literal that never occurs) returns the input unchanged: a splice either
/// fully applies or leaves the document as it was.
#[must_use]
pub fn splice(text: &str, request: &SpliceRequest) -> String {
    match &request.target {
        SpliceTarget::Section(section) => splice_section(text, section, &request.replacement),
        SpliceTarget::Range { start, end } => {
            splice_range(text, *start, *end, &request.replacement)
        }
        SpliceTarget::Literal { old } => text.replacen(old.as_str(), &request.replacement, 1),
    }
}

/// Replaces a section's body, preserving its header line byte for byte.
///
/// The header boundary is re-derived from the text rather than taken from the
/// snapshot: the first line of the section's span that matches the header
/// rule with the snapshot's title ends the header (falling back to the first
/// line when no line matches). Synthetic sections have no header and are
/// replaced whole.
fn splice_section(text: &str, section: &Section, replacement: &str) -> String {
    let start = section.byte_start.min(text.len());
    let end = section.byte_end.min(text.len()).max(start);
    let span = &text[start..end];

    let body_start = if section.is_synthetic() {
        start
    } else {
        start + header_end(span, &section.title)
    };

    let trimmed = replacement.trim();
    let mut out = String::with_capacity(body_start + trimmed.len() + (text.len() - end) + 1);
    out.push_str(&text[..body_start]);
    if !section.is_synthetic() && !trimmed.is_empty() && !out.ends_with('\n') {
        // Header line at end of input without its newline yet.
        out.push('\n');
    }
    out.push_str(trimmed);
    if end < text.len() {
        // Content follows: the next section's header must start on its own line.
        out.push('\n');
    }
    out.push_str(&text[end..]);
    out
}

/// Byte offset, within the span, of the first body character after the
/// section's header line.
fn header_end(span: &str, title: &str) -> usize {
    let mut cursor = 0usize;
    let mut first_line_end = None;
    for line in span.split('\n') {
        let line_end = (cursor + line.len() + 1).min(span.len());
        if first_line_end.is_none() {
            first_line_end = Some(line_end);
        }
        if let Some((_, line_title)) = header_line(line) {
            if line_title == title {
                return line_end;
            }
        }
        cursor += line.len() + 1;
    }
    first_line_end.unwrap_or(0)
}

/// Replaces an absolute byte range, leaving the document untouched when the
/// range does not fall on character boundaries.
fn splice_range(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let end = end.max(start);
    match (text.get(..start), text.get(end.min(text.len())..)) {
        (Some(before), Some(after)) => {
            let mut out = String::with_capacity(before.len() + replacement.len() + after.len());
            out.push_str(before);
            out.push_str(replacement);
            out.push_str(after);
            out
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/splice.rs"]
mod tests;
