//! Section representation and the line-scanning parser behind it.
//!
//! A section is a contiguous span of the document starting at a markdown
//! header line (or a synthetic start) and extending to the next header or the
//! end of the document. Sections are ephemeral: they are recomputed from the
//! full text after every mutation and carry byte offsets that are only valid
//! against the text they were parsed from.

use crate::formats::markdown::header_line;
use serde::{Deserialize, Serialize};

/// Title given to the synthetic section holding content before the first
/// header.
pub const PREAMBLE_TITLE: &str = "Preamble";

/// Title given to the single synthetic section covering a document with no
/// headers at all.
pub const WHOLE_DOCUMENT_TITLE: &str = "Contract";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Contiguous document division with precise byte coordinates for extraction
/// and replacement.
pub struct Section {
    /// Section heading text without markup symbols.
    pub title: String,
    /// Header depth 1-6, or 0 for a synthetic section with no header line.
    pub level: u8,
    /// Content between the header line and the next section, with leading and
    /// trailing blank lines trimmed.
    pub body: String,
    /// Byte offset of the first character of the header line (or of the
    /// content, for a synthetic section).
    pub byte_start: usize,
    /// Byte offset immediately before the next section's header line, or the
    /// document length for the last section.
    pub byte_end: usize,
}

impl Section {
    #[must_use]
    /// True for the synthetic preamble/whole-document sections, which have no
    /// header line to preserve.
    pub fn is_synthetic(&self) -> bool {
        self.level == 0
    }

    #[must_use]
    /// The section's full span in the document it was parsed from, header
    /// line included. Out-of-date offsets are clamped rather than trusted.
    pub fn full_text<'a>(&self, document: &'a str) -> &'a str {
        let start = self.byte_start.min(document.len());
        let end = self.byte_end.min(document.len());
        &document[start..end.max(start)]
    }
}

/// Splits the document into an ordered, contiguous list of sections.
///
/// One pass over the lines with a running byte cursor. A header line closes
/// the open section and opens the next; content before the first header
/// becomes a synthetic preamble section; a document with no headers at all
/// becomes a single synthetic section titled "Contract". Adjacent sections
/// always satisfy `sections[i].byte_end == sections[i + 1].byte_start`, the
/// first starts at 0 and the last ends at the document length, so
/// concatenating every section's `full_text` reconstructs the input exactly.
///
/// Empty input yields no sections. Header levels are not required to nest;
/// the output is a flat ordered list, never a tree.
#[must_use]
pub fn parse_sections(text: &str) -> Vec<Section> {
    if text.is_empty() {
        return Vec::new();
    }

    struct Open {
        title: String,
        level: u8,
        start: usize,
        lines: Vec<String>,
    }

    let mut sections = Vec::new();
    let mut open: Option<Open> = None;
    let mut leading: Vec<String> = Vec::new();
    let mut cursor = 0usize;

    for line in text.split('\n') {
        let line_start = cursor;
        cursor += line.len() + 1;

        if let Some((level, title)) = header_line(line) {
            if let Some(closed) = open.take() {
                sections.push(Section {
                    title: closed.title,
                    level: closed.level,
                    body: join_body(&closed.lines),
                    byte_start: closed.start,
                    byte_end: line_start,
                });
            } else if !leading.is_empty() {
                sections.push(Section {
                    title: PREAMBLE_TITLE.to_string(),
                    level: 0,
                    body: join_body(&leading),
                    byte_start: 0,
                    byte_end: line_start,
                });
            }
            open = Some(Open {
                title: title.to_string(),
                level,
                start: line_start,
                lines: Vec::new(),
            });
        } else if let Some(current) = open.as_mut() {
            current.lines.push(line.to_string());
        } else {
            leading.push(line.to_string());
        }
    }

    if let Some(closed) = open {
        sections.push(Section {
            title: closed.title,
            level: closed.level,
            body: join_body(&closed.lines),
            byte_start: closed.start,
            byte_end: text.len(),
        });
    } else {
        // No header anywhere: the whole document is one synthetic section.
        sections.push(Section {
            title: WHOLE_DOCUMENT_TITLE.to_string(),
            level: 0,
            body: text.trim().to_string(),
            byte_start: 0,
            byte_end: text.len(),
        });
    }

    sections
}

/// Joins accumulated body lines, dropping leading and trailing blank lines.
fn join_body(lines: &[String]) -> String {
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);
    lines[first..=last].join("\n")
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
