//! Hosted NLP provider: language detection, sentiment and extractive summary.
//!
//! # Architecture
//!
//! - [`TextAnalytics`]: the seam the orchestration layer depends on
//! - [`azure::AzureLanguageClient`]: implementation over the Azure AI Language REST API
//! - [`retry::RetryProvider`]: decorator that retries transient failures with backoff
//!
//! The heuristics never go through this module; they only need the raw text.

pub mod azure;
pub mod retry;

use thiserror::Error;

use crate::models::NlpAnalysis;

/// Summary shown when the provider selects no sentence.
pub const SUMMARY_FALLBACK: &str = "No se pudo generar resumen.";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("document rejected: {code} - {message}")]
    Document { code: String, message: String },
    #[error("missing {0} in provider response")]
    MissingResult(&'static str),
    #[error("summarization job response had no operation-location header")]
    MissingOperationLocation,
    #[error("summarization job {status}: {message}")]
    JobFailed { status: String, message: String },
    #[error("summarization job did not finish within {0}s")]
    Timeout(u64),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Timeout(_) => true,
            _ => false,
        }
    }
}

/// A service that turns raw text into an [`NlpAnalysis`].
pub trait TextAnalytics {
    async fn analyze(&self, text: &str) -> Result<NlpAnalysis, ProviderError>;
}

/// Join the first `max` summary sentences with spaces, or the fallback when there are none.
pub fn build_summary(sentences: &[String], max: usize) -> String {
    if sentences.is_empty() {
        return SUMMARY_FALLBACK.to_string();
    }
    sentences
        .iter()
        .take(max)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
