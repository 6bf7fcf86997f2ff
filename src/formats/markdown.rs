//! Markdown line rules: ATX headers, rules, lists, and bold spans.
//!
//! The header rule here is the single authority for section splitting: a line
//! is a header if and only if [`header_line`] says so. A line that is merely
//! bold-wrapped (`**Definitions**`) is emphasis, not a header, and must never
//! split a section. The styled rendering in [`styled_line`] reuses the same
//! classification so the document pane shows exactly the structure the parser
//! sees.

use crate::formats::LineKind;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

// Heading palette by level, warm gold fading out with depth.
const HEADING_H1_COLOR: Color = Color::Rgb(255, 215, 100);
const HEADING_H2_COLOR: Color = Color::Rgb(240, 190, 90);
const HEADING_H3_COLOR: Color = Color::Rgb(220, 170, 80);
const HEADING_COLOR: Color = Color::Rgb(200, 155, 75);
const RULE_COLOR: Color = Color::Rgb(100, 100, 100);
const MARKER_COLOR: Color = Color::Cyan;

#[must_use]
/// Matches the ATX header rule: 1-6 `#` characters, at least one whitespace
/// character, then non-empty title text. Returns the depth and the title with
/// markers and surrounding whitespace stripped.
pub fn header_line(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim();
    let rest = trimmed.trim_start_matches('#');
    let hashes = trimmed.len() - rest.len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((u8::try_from(hashes).unwrap_or(6), title))
}

#[must_use]
/// Matches a thematic break: three or more `-`, `*`, or `_` with nothing else
/// on the line but spaces.
pub fn horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| *c != ' ').collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| compact.chars().all(|c| c == *marker))
}

#[must_use]
/// Classifies one line of the document.
pub fn classify_line(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some((level, _)) = header_line(line) {
        return LineKind::Header(level);
    }
    if horizontal_rule(line) {
        return LineKind::HorizontalRule;
    }
    let indent = line.len() - line.trim_start().len();
    let body = line.trim_start();
    if let Some(rest) = body.strip_prefix(['-', '*', '+']) {
        if rest.starts_with(' ') {
            return LineKind::Unordered(indent);
        }
    }
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let after = &body[digits..];
        if (after.starts_with('.') || after.starts_with(')')) && after[1..].starts_with(' ') {
            return LineKind::Ordered(indent);
        }
    }
    LineKind::Text
}

#[must_use]
/// Splits a line into `(text, is_bold)` segments on paired `**` markers.
/// An unpaired trailing `**` is kept as literal text.
pub fn bold_segments(line: &str) -> Vec<(String, bool)> {
    let mut segments = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find("**") {
        let Some(close) = rest[open + 2..].find("**").map(|i| open + 2 + i) else {
            break;
        };
        if open > 0 {
            segments.push((rest[..open].to_string(), false));
        }
        segments.push((rest[open + 2..close].to_string(), true));
        rest = &rest[close + 2..];
    }
    if !rest.is_empty() {
        segments.push((rest.to_string(), false));
    }
    segments
}

#[must_use]
/// Renders one document line as a styled ratatui line, driven entirely by
/// [`classify_line`] so the pane cannot disagree with the section parser.
pub fn styled_line(line: &str) -> Line<'static> {
    match classify_line(line) {
        LineKind::Blank => Line::from(String::new()),
        LineKind::Header(level) => {
            let color = match level {
                1 => HEADING_H1_COLOR,
                2 => HEADING_H2_COLOR,
                3 => HEADING_H3_COLOR,
                _ => HEADING_COLOR,
            };
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        LineKind::HorizontalRule => Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(RULE_COLOR),
        )),
        LineKind::Ordered(indent) | LineKind::Unordered(indent) => {
            let body = line.trim_start();
            let marker_len = body.find(' ').map_or(body.len(), |i| i + 1);
            let mut spans = vec![
                Span::raw(" ".repeat(indent)),
                Span::styled(
                    body[..marker_len].to_string(),
                    Style::default().fg(MARKER_COLOR),
                ),
            ];
            spans.extend(emphasis_spans(&body[marker_len..]));
            Line::from(spans)
        }
        LineKind::Text => Line::from(emphasis_spans(line)),
    }
}

fn emphasis_spans(text: &str) -> Vec<Span<'static>> {
    bold_segments(text)
        .into_iter()
        .map(|(segment, bold)| {
            if bold {
                Span::styled(segment, Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(segment)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
