//! Configuration to acknowledge deployment specifics as well as set defaults.
//!
//! Specifically, we try to find a redline.toml, and if present we load
//! settings from there. This provides the backend endpoint, the retrieval
//! index names, and editor preferences. The bearer token can also come from
//! the `REDLINE_TOKEN` environment variable, which wins over the file.

use facet::Facet;
use std::fs;

#[derive(Facet, Clone)]
/// Settings loaded from redline.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "https://academy.beyond-search.uat.udi.beyond.ai/api/sessions/texts".to_string())]
    /// Drafting backend endpoint accepting `question_body` requests.
    pub endpoint: String,
    #[facet(default = String::new())]
    /// Bearer token sent with every backend call. Empty disables the header.
    pub api_token: String,
    #[facet(default = vec!["1762885457669_uat_contracts".to_string()])]
    /// Retrieval index names forwarded with every question.
    pub index_name: Vec<String>,
    #[facet(default = 100)]
    /// Maximum line width for editor text wrapping.
    pub wrap_width: usize,
    #[facet(default = true)]
    /// Stream generations delta by delta instead of waiting for one JSON
    /// response.
    pub streaming: bool,
}

impl Config {
    #[must_use]
    /// Load configuration from redline.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_else(|| {
            facet_toml::from_str::<Self>("").unwrap()
        });
        if let Ok(token) = std::env::var("REDLINE_TOKEN") {
            config.api_token = token;
        }
        config
    }

    fn from_file() -> Option<Self> {
        let contents = fs::read_to_string("redline.toml").ok()?;
        facet_toml::from_str::<Self>(&contents).ok()
    }
}
