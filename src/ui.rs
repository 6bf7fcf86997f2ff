//! The UI renders the application state into something visible and vim-able.
//!
//! The draw function dispatches based on the current view. The list view
//! shows the section outline beside the rendered document; the detail view
//! hosts the draft editor; the chat view shows the active section's
//! transcript.

use crate::app_state::{AppState, SelectionState, View};
use crate::config::Config;
use crate::conversation::Role;
use crate::formats::markdown::styled_line;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState, _cfg: &Config) {
    // Command mode renders the view it was entered from, plus the buffer.
    let effective = if app.current_view == View::Command {
        app.command_return
    } else {
        app.current_view
    };
    match effective {
        View::List | View::Command => draw_list(f, app),
        View::Detail => draw_detail(f, app),
        View::Chat => draw_chat(f, app),
    }
}

fn draw_list(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(chunks[0]);

    let items: Vec<ListItem> = app
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
            let line = Line::from(vec![
                Span::raw(indent),
                Span::raw(section.title.clone()),
            ]);

            let style = if i == app.cursor_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if Some(i) == app.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if !app.is_selectable(i) {
                // Title and synthetic sections are context, not targets.
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = if app.streaming {
        format!("Sections ({} so far, drafting...)", app.sections.len())
    } else {
        format!("Sections ({})", app.sections.len())
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, panes[0]);

    let rendered: Vec<Line> = app.document.lines().map(styled_line).collect();
    let document = Paragraph::new(rendered)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Contract"));
    f.render_widget(document, panes[1]);

    let help_text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        "↑/↓: Navigate | Enter: Edit | c: Chat | :w <file> Export | q: Quit".to_string()
    };
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}

fn draw_detail(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Section heading
            Constraint::Min(0),    // Editor
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    if let Some(section) = app.current_section.clone() {
        let heading = format!("{} {}", "#".repeat(usize::from(section.level)), section.title);
        let heading_widget =
            Paragraph::new(heading).block(Block::default().borders(Borders::ALL).title("Section"));
        f.render_widget(heading_widget, chunks[0]);

        let max_width = app.wrap_width;
        let title = format!("Body: {} (max line: {max_width} chars)", section.title);

        if let Some(ref mut editor_state) = app.editor_state {
            let block = Block::default().borders(Borders::ALL).title(title);
            let inner = block.inner(chunks[1]);
            f.render_widget(block, chunks[1]);

            let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
            let editor = EditorView::new(editor_state)
                .theme(EditorTheme::default())
                .syntax_highlighter(Some(syntax_highlighter))
                .wrap(true);

            f.render_widget(editor, inner);
        }
    }

    let help_text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        ":w Save | :x Save & Exit | :q Quit | Esc: Back".to_string()
    };
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn draw_chat(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let topic = app.current_topic();
    let mut lines: Vec<Line> = Vec::new();
    for turn in app.conversations.history(&topic) {
        let (label, color) = match turn.role {
            Role::User => ("you", Color::Cyan),
            Role::Assistant => ("assistant", Color::Green),
        };
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for content_line in turn.content.lines() {
            lines.push(Line::from(format!("  {content_line}")));
        }
        lines.push(Line::from(String::new()));
    }

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Chat: {topic}")),
        );
    f.render_widget(transcript, chunks[0]);

    let input = Paragraph::new(format!("> {}", app.chat_input))
        .block(Block::default().borders(Borders::ALL).title("Message"));
    f.render_widget(input, chunks[1]);

    let help_text = if app.selection_state == SelectionState::Unselected {
        "Enter: Ask | Esc: Back (answers are informational, nothing is rewritten)"
    } else {
        "Enter: Request rewrite of the selected section | Esc: Back"
    };
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
