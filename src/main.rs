//! redline: generate, review, and rewrite contracts section by section.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use redline::app_state::{AppState, View};
use redline::client::{self, BackendClient, DealTerms};
use redline::config::Config;
use redline::conversation::Role;
use redline::stream::StreamEvent;
use redline::ui;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Section-aware contract drafting and review", long_about = None)]
struct Args {
    /// Existing contract to open instead of generating one
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Generate a contract from a deal-terms TOML file
    #[arg(long, value_name = "TOML")]
    terms: Option<PathBuf>,

    /// Ask a one-shot question and print the answer, no TUI
    #[arg(long, value_name = "TEXT")]
    ask: Option<String>,

    /// Wait for the full response instead of streaming
    #[arg(long)]
    no_stream: bool,
}

/// What a backend response is for, and therefore where its text goes.
#[derive(Clone, Copy, PartialEq)]
enum JobKind {
    /// Deltas append to the document as they arrive.
    Draft,
    /// Deltas accumulate, then splice into the active target on completion.
    Rewrite,
    /// Deltas accumulate, then land in the transcript only.
    Answer,
}

/// One backend request handed to the worker thread.
struct Job {
    kind: JobKind,
    question: String,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = Config::load();
    let streaming = cfg.streaming && !args.no_stream;

    if let Some(question) = args.ask.as_deref() {
        return run_ask(&cfg, question);
    }

    let initial = match &args.path {
        Some(path) => std::fs::read_to_string(path)?,
        None => String::new(),
    };

    let mut app = AppState::new(initial, cfg.wrap_width);
    let (job_tx, event_rx) = spawn_worker(&cfg, streaming)?;

    if let Some(terms_path) = &args.terms {
        let terms = DealTerms::load(terms_path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        app.begin_stream();
        let _ = job_tx.send(Job {
            kind: JobKind::Draft,
            question: client::build_contract_prompt(&terms),
        });
    }

    run_tui(app, &cfg, &job_tx, &event_rx)
}

/// One-shot question answered over the non-streaming variant.
fn run_ask(cfg: &Config, question: &str) -> io::Result<()> {
    let backend = BackendClient::new(cfg);
    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(backend.generate(question)) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => Err(io::Error::other(e.to_string())),
    }
}

/// Starts the background thread owning the HTTP client and its runtime.
///
/// All network work happens here; the TUI thread only ever receives
/// [`StreamEvent`]s, so every document mutation stays on one thread.
fn spawn_worker(
    cfg: &Config,
    streaming: bool,
) -> io::Result<(mpsc::Sender<Job>, mpsc::Receiver<(JobKind, StreamEvent)>)> {
    let backend = BackendClient::new(cfg);
    let runtime = tokio::runtime::Runtime::new()?;
    let (job_tx, job_rx) = mpsc::channel::<Job>();
    let (event_tx, event_rx) = mpsc::channel();

    thread::spawn(move || {
        while let Ok(job) = job_rx.recv() {
            let result: Result<(), client::BackendError> = if streaming {
                runtime.block_on(backend.generate_streaming(&job.question, &mut |delta| {
                    let _ = event_tx.send((job.kind, StreamEvent::Delta(delta)));
                }))
            } else {
                match runtime.block_on(backend.generate(&job.question)) {
                    Ok(text) => {
                        let _ = event_tx.send((job.kind, StreamEvent::Delta(text)));
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            };
            let terminal_event = match result {
                Ok(()) => StreamEvent::Done,
                Err(e) => StreamEvent::Error(e.to_string()),
            };
            if event_tx.send((job.kind, terminal_event)).is_err() {
                break;
            }
        }
    });

    Ok((job_tx, event_rx))
}

fn run_tui(
    mut app: AppState,
    cfg: &Config,
    job_tx: &mpsc::Sender<Job>,
    event_rx: &mpsc::Receiver<(JobKind, StreamEvent)>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, cfg, &mut editor_handler, job_tx, event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else if !app.conversations.is_empty() {
        let json = serde_json::to_string_pretty(&app.conversations).map_err(io::Error::other)?;
        println!("{json}");
    }

    Ok(())
}

/// Routes one backend event into the session. Rewrites and answers buffer
/// their text in `pending` until the stream completes.
fn handle_stream_event(app: &mut AppState, kind: JobKind, ev: StreamEvent, pending: &mut String) {
    match (kind, ev) {
        (JobKind::Draft, StreamEvent::Delta(delta)) => app.append_delta(&delta),
        (JobKind::Draft, StreamEvent::Done) => app.end_stream(),
        (JobKind::Draft, StreamEvent::Error(err)) => {
            // Whatever already streamed in stays; the user edits from there.
            app.end_stream();
            app.message = Some(format!("Draft failed: {err}"));
        }
        (JobKind::Rewrite | JobKind::Answer, StreamEvent::Delta(delta)) => {
            pending.push_str(&delta);
        }
        (JobKind::Rewrite, StreamEvent::Done) => {
            let body = mem::take(pending);
            app.record_turn(Role::Assistant, &body);
            if app.apply_assistant_rewrite(&body) {
                app.message = Some("Section rewritten".to_string());
            }
        }
        (JobKind::Answer, StreamEvent::Done) => {
            let answer = mem::take(pending);
            app.record_turn(Role::Assistant, &answer);
        }
        (JobKind::Rewrite | JobKind::Answer, StreamEvent::Error(err)) => {
            pending.clear();
            app.message = Some(format!("Assistant request failed: {err}"));
        }
    }
}

/// Submits the chat input line: a rewrite request when a section is active,
/// a plain question otherwise.
fn submit_chat(app: &mut AppState, job_tx: &mpsc::Sender<Job>) {
    let message = app.take_chat_input();
    if message.trim().is_empty() {
        return;
    }
    app.record_turn(Role::User, &message);

    let job = app.current_section.as_ref().map_or_else(
        || Job {
            kind: JobKind::Answer,
            question: message.clone(),
        },
        |section| Job {
            kind: JobKind::Rewrite,
            question: client::build_rewrite_prompt(&section.title, &section.body, &message),
        },
    );
    if job_tx.send(job).is_err() {
        app.message = Some("Backend worker is gone".to_string());
    }
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    cfg: &Config,
    editor_handler: &mut EditorEventHandler,
    job_tx: &mpsc::Sender<Job>,
    event_rx: &mpsc::Receiver<(JobKind, StreamEvent)>,
) -> io::Result<()> {
    let mut pending = String::new();

    loop {
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        // Drain backend events between draws.
        while let Ok((kind, ev)) = event_rx.try_recv() {
            handle_stream_event(app, kind, ev, &mut pending);
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match app.current_view {
                View::List => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up => {
                        if let Some(prev) = app.find_prev_section() {
                            app.cursor_index = prev;
                        }
                    }
                    KeyCode::Down => {
                        if let Some(next) = app.find_next_section() {
                            app.cursor_index = next;
                        }
                    }
                    KeyCode::Enter => {
                        if app.select(app.cursor_index) {
                            app.enter_edit();
                        } else if !app.is_selectable(app.cursor_index) {
                            app.message = Some("This section is read-only".to_string());
                        }
                    }
                    KeyCode::Char('c') => {
                        if app.is_selectable(app.cursor_index) {
                            app.select(app.cursor_index);
                        } else {
                            app.deselect();
                        }
                        app.current_view = View::Chat;
                    }
                    KeyCode::Esc => {
                        app.deselect();
                    }
                    KeyCode::Char(':') => {
                        app.command_return = View::List;
                        app.current_view = View::Command;
                        app.command_buffer.clear();
                        app.message = None;
                    }
                    _ => {}
                },
                View::Detail => match key.code {
                    KeyCode::Char(':') => {
                        if let Some(ref editor_state) = app.editor_state {
                            if editor_state.mode == edtui::EditorMode::Normal {
                                app.command_return = View::Detail;
                                app.current_view = View::Command;
                                app.command_buffer.clear();
                                app.message = None;
                            } else {
                                editor_handler
                                    .on_key_event(key, app.editor_state.as_mut().unwrap());
                            }
                        }
                    }
                    KeyCode::Esc => {
                        if let Some(ref editor_state) = app.editor_state {
                            if editor_state.mode == edtui::EditorMode::Normal {
                                app.cancel_edit();
                            } else {
                                editor_handler
                                    .on_key_event(key, app.editor_state.as_mut().unwrap());
                            }
                        }
                    }
                    _ => {
                        if let Some(ref mut editor_state) = app.editor_state {
                            editor_handler.on_key_event(key, editor_state);
                        }
                    }
                },
                View::Chat => match key.code {
                    KeyCode::Esc => {
                        app.current_view = View::List;
                    }
                    KeyCode::Enter => {
                        submit_chat(app, job_tx);
                    }
                    KeyCode::Char(c) => {
                        app.chat_input.push(c);
                    }
                    KeyCode::Backspace => {
                        app.chat_input.pop();
                    }
                    _ => {}
                },
                View::Command => match key.code {
                    KeyCode::Char(c) => {
                        app.command_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.command_buffer.pop();
                    }
                    KeyCode::Enter => {
                        let cmd = app.command_buffer.clone();
                        app.current_view = app.command_return;

                        match cmd.as_str() {
                            "w" => {
                                if app.editor_state.is_some() {
                                    app.save_edit();
                                } else {
                                    app.message = Some("Nothing to save".to_string());
                                }
                            }
                            "x" => {
                                if app.editor_state.is_some() {
                                    app.save_edit();
                                }
                            }
                            "q" => {
                                if app.editor_state.is_some() {
                                    app.cancel_edit();
                                } else {
                                    return Ok(());
                                }
                            }
                            "q!" => return Ok(()),
                            other => {
                                if let Some(path) = other.strip_prefix("w ") {
                                    let path = path.trim();
                                    match app.export(Path::new(path)) {
                                        Ok(()) => {
                                            app.message = Some(format!("Exported to {path}"));
                                        }
                                        Err(e) => {
                                            app.message = Some(format!("Error exporting: {e}"));
                                        }
                                    }
                                } else {
                                    app.message = Some(format!("Unknown command: {cmd}"));
                                }
                            }
                        }
                        app.command_buffer.clear();
                    }
                    KeyCode::Esc => {
                        app.current_view = app.command_return;
                        app.command_buffer.clear();
                    }
                    _ => {}
                },
            }
        }
    }
}
