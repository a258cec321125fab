//! Article text extraction from a web page.
//!
//! Downloads the page and concatenates the text of every `<p>` element.
//! Most news sites keep the story body in paragraphs, so this is enough to
//! get readable article text without site-specific selectors.

use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::{ExtractionConfig, HttpConfig};
use crate::utils::truncate_chars;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Error extrayendo texto: URL inválida {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Error extrayendo texto: esquema no soportado {0}")]
    UnsupportedScheme(String),
    #[error("Error extrayendo texto: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error extrayendo texto: HTTP {status} en {url}")]
    Status { url: String, status: u16 },
    #[error("Error extrayendo texto: la página no contiene párrafos")]
    Empty,
}

/// Source of article text given a URL.
pub trait TextExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractError>;
}

/// [`TextExtractor`] backed by a reusable HTTP client.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: Client,
    max_chars: usize,
}

impl HttpExtractor {
    pub fn new(http: &HttpConfig, extraction: &ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_chars: extraction.max_chars,
        })
    }
}

impl TextExtractor for HttpExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Result<String, ExtractError> {
        let parsed = parse_http_url(url)?;

        let resp = self.client.get(parsed).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Page fetch returned an error status");
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let text = paragraph_text(&body, self.max_chars);
        if text.is_empty() {
            return Err(ExtractError::Empty);
        }

        info!(chars = text.chars().count(), "Extracted article text");
        Ok(text)
    }
}

fn parse_http_url(url: &str) -> Result<Url, ExtractError> {
    let parsed = Url::parse(url.trim()).map_err(|source| ExtractError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractError::UnsupportedScheme(other.to_string())),
    }
}

/// Join the text of all `<p>` elements with spaces, trim, and keep at most
/// `max_chars` characters.
pub fn paragraph_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").expect("static selector");

    let joined = document
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(joined.trim(), max_chars).to_string()
}
