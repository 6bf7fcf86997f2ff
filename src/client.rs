//! The drafting-backend boundary: prompts, requests, response extraction.
//!
//! The backend is a black box that answers a `question_body` either as a
//! `data: <json>` event stream or as a single JSON object. Everything here is
//! single-shot: a failed call is reported upward for the user to re-trigger,
//! never retried automatically, and deltas already delivered before a failure
//! stay applied.

use crate::config::Config;
use crate::stream::SseDecoder;
use facet::Facet;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Response keys probed for the generated text, in priority order. The
/// backend's native `answer_body` comes last, after the shapes produced by
/// proxies in front of it.
const TEXT_KEYS: [&str; 7] = [
    "llm_response",
    "contract",
    "text",
    "content",
    "result",
    "message",
    "answer_body",
];

/// Errors from one backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never completed.
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
    /// The response carried no recognised text field.
    #[error("no recognised text field in backend response")]
    MissingField,
}

#[derive(Facet, Clone)]
/// The supply-agreement deal terms, loaded from a TOML file.
pub struct DealTerms {
    #[facet(default = String::new())]
    /// Counterparty supplying the goods.
    pub supplier_name: String,
    #[facet(default = String::new())]
    /// What is being supplied.
    pub product: String,
    #[facet(default = String::new())]
    /// Committed yearly quantity.
    pub annual_volume: String,
    #[facet(default = String::new())]
    /// Delivery terms (incoterms, cadence, locations).
    pub delivery: String,
    #[facet(default = String::new())]
    /// Pricing model and adjustments.
    pub pricing: String,
    #[facet(default = String::new())]
    /// Invoicing and payment schedule.
    pub payment_terms: String,
    #[facet(default = String::new())]
    /// Initial term and renewals.
    pub contract_duration: String,
    #[facet(default = String::new())]
    /// Applicable quality standards and inspection rights.
    pub quality_standards: String,
    #[facet(default = String::new())]
    /// Warranty scope and duration.
    pub warranty: String,
    #[facet(default = String::new())]
    /// Regulatory and certification requirements.
    pub compliance: String,
    #[facet(default = String::new())]
    /// Risk allocation, insurance, liability caps.
    pub risk_requirements: String,
    #[facet(default = String::new())]
    /// Anything the standard headings do not cover.
    pub additional_clauses: String,
}

impl DealTerms {
    /// Load deal terms from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        facet_toml::from_str::<Self>(&contents)
            .map_err(|e| anyhow::anyhow!("invalid deal terms in {}: {e}", path.display()))
    }
}

#[must_use]
/// Builds the drafting prompt from deal terms: the details block followed by
/// the request for the full contract and a compliance check summary.
pub fn build_contract_prompt(terms: &DealTerms) -> String {
    format!(
        "I need a Supply Agreement Contract. Here are the details:\n\n\
         Supplier Name: {}\n\n\
         Product: {}\n\n\
         Annual Volume: {}\n\n\
         Delivery: {}\n\n\
         Pricing: {}\n\n\
         Payment Terms: {}\n\n\
         Contract Duration: {}\n\n\
         Quality Standards: {}\n\n\
         Warranty: {}\n\n\
         Compliance: {}\n\n\
         Risk Requirements: {}\n\n\
         Additional Clauses: {}\n\n\
         Please generate the full Supply Agreement Contract and then provide \
         a compliance check summary.",
        terms.supplier_name,
        terms.product,
        terms.annual_volume,
        terms.delivery,
        terms.pricing,
        terms.payment_terms,
        terms.contract_duration,
        terms.quality_standards,
        terms.warranty,
        terms.compliance,
        terms.risk_requirements,
        terms.additional_clauses,
    )
}

#[must_use]
/// Builds a rewrite prompt for one section: the current body plus the user's
/// instruction, asking for the replacement body alone.
pub fn build_rewrite_prompt(title: &str, body: &str, instruction: &str) -> String {
    format!(
        "Here is the \"{title}\" section of a Supply Agreement Contract:\n\n\
         {body}\n\n\
         Rewrite this section as follows: {instruction}\n\n\
         Return only the rewritten section body, without the heading."
    )
}

/// Finds the generated text inside a backend response value.
///
/// A bare string is the text itself. Otherwise the keys in [`TEXT_KEYS`] are
/// probed in order, descending first into a top-level `data` object when the
/// backend nests its answer there. `None` means the call failed to produce
/// text and is a fatal error for that request.
#[must_use]
pub fn extract_text(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_string());
    }
    let scope = value.get("data").filter(|v| v.is_object()).unwrap_or(value);
    TEXT_KEYS
        .iter()
        .find_map(|key| scope.get(key).and_then(Value::as_str))
        .map(ToString::to_string)
}

/// HTTP client for the drafting backend.
pub struct BackendClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    index_name: Vec<String>,
}

impl BackendClient {
    #[must_use]
    /// A client configured from `redline.toml` settings.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            token: if config.api_token.is_empty() {
                None
            } else {
                Some(config.api_token.clone())
            },
            index_name: config.index_name.clone(),
        }
    }

    fn request(&self, question: &str) -> reqwest::RequestBuilder {
        let payload = serde_json::json!({
            "question_body": question,
            "index_name": self.index_name,
        });
        let mut request = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Streams a generation, invoking `sink` once per delta in arrival order.
    ///
    /// Resolves once the stream completes and the final buffer flush has run.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or a non-success status. Deltas already
    /// passed to `sink` are confirmed regardless of a later failure.
    pub async fn generate_streaming<F: FnMut(String)>(
        &self,
        question: &str,
        sink: &mut F,
    ) -> Result<(), BackendError> {
        let response = self.request(question).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status()));
        }

        let mut decoder = SseDecoder::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            decoder.push(&String::from_utf8_lossy(&chunk), sink);
        }
        decoder.finish(sink);
        Ok(())
    }

    /// Fetches a generation as a single JSON response and extracts its text.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, a non-success status, or a response with no
    /// recognised text field.
    pub async fn generate(&self, question: &str) -> Result<String, BackendError> {
        let response = self.request(question).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status(response.status()));
        }
        let value: Value = response.json().await?;
        extract_text(&value).ok_or(BackendError::MissingField)
    }
}

#[cfg(test)]
#[path = "tests/client.rs"]
mod tests;
