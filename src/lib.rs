//! redline: section-aware contract drafting and review in the terminal.
//!
//! A contract is a single markdown-ish text buffer. redline parses it into an
//! ordered list of titled sections with stable byte offsets, streams generated
//! text into it from a drafting backend, and splices manual or
//! assistant-driven rewrites back into exactly the span they belong to without
//! disturbing sibling sections.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod client;
pub mod config;
pub mod conversation;
pub mod formats;
pub mod section;
pub mod splice;
pub mod stream;
pub mod ui;
