//! Data models for analyzed articles and their credibility reports.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RedFlag`] and [`Classification`]: heuristic verdicts on the raw text
//! - [`Sentiment`], [`SentenceSentiment`] and [`SentimentDistribution`]:
//!   sentence-level sentiment as returned by the NLP provider and its aggregate
//! - [`NlpAnalysis`]: everything the hosted NLP provider returns for one text
//! - [`AnalysisReport`]: the full report for one "analyze" action
//! - [`HistoryEntry`]: the truncated copy of a report kept in the session history
//!
//! Display labels are Spanish, matching the articles the heuristics target.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::truncate_chars;

/// Sentinel shown when the provider did not report a language or sentiment.
pub const UNKNOWN: &str = "Desconocido";

/// Number of characters of the analyzed text kept in a history entry.
pub const HISTORY_PREVIEW_CHARS: usize = 120;

/// A manipulation-signal category detected in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedFlag {
    /// Sensationalist headline phrasing.
    Clickbait,
    /// Emotionally charged, moralizing or ideological wording.
    BiasedLanguage,
    /// Nothing matched.
    NoSignals,
}

impl RedFlag {
    pub fn label(&self) -> &'static str {
        match self {
            RedFlag::Clickbait => "Posible clickbait",
            RedFlag::BiasedLanguage => "Lenguaje sesgado o emocional",
            RedFlag::NoSignals => "Sin señales de manipulación detectadas",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Join flags into the single display string stored in the history.
pub fn join_flags(flags: &[RedFlag]) -> String {
    flags.iter().map(RedFlag::label).join(", ")
}

/// The single heuristic credibility label assigned to a text.
///
/// Variants are listed in priority order: when several cue groups match,
/// the first one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Satire,
    FakeNews,
    ClickbaitInformative,
    Informative,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Satire => "Sátira o contenido humorístico",
            Classification::FakeNews => "Posible fake news o desinformación",
            Classification::ClickbaitInformative => "Contenido informativo con fuerte clickbait",
            Classification::Informative => "Informativo o neutral",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sentiment label as reported by the NLP provider.
///
/// Sentences are always `positive`, `neutral` or `negative`; the
/// document-level label may also be `mixed`. Anything else decodes to
/// [`Sentiment::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
    #[serde(other)]
    Other,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
            Sentiment::Other => "other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Neutral => "😐",
            _ => "😠",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sentence of the analyzed text and the sentiment the provider gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSentiment {
    pub text: String,
    pub sentiment: Sentiment,
}

impl SentenceSentiment {
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
        }
    }
}

/// Share of positive, neutral and negative sentences, in percent with one decimal.
///
/// The three values are rounded independently and are not forced to add up
/// to exactly 100.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

/// Result of running the hosted NLP provider over one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpAnalysis {
    /// Language name, e.g. `"Spanish"`.
    pub language: Option<String>,
    /// ISO 639-1 code, e.g. `"es"`.
    pub language_code: Option<String>,
    /// Document-level sentiment.
    pub sentiment: Option<Sentiment>,
    /// Sentences in document order.
    pub sentences: Vec<SentenceSentiment>,
    /// Extractive summary.
    pub summary: String,
}

/// The full credibility report for one analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analyzed_at: DateTime<Utc>,
    pub text: String,
    pub language: Option<String>,
    pub language_code: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub summary: String,
    pub sentences: Vec<SentenceSentiment>,
    pub flags: Vec<RedFlag>,
    pub classification: Classification,
    pub distribution: SentimentDistribution,
}

impl AnalysisReport {
    pub fn language_or_unknown(&self) -> &str {
        self.language.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn sentiment_or_unknown(&self) -> &str {
        self.sentiment.as_ref().map(Sentiment::as_str).unwrap_or(UNKNOWN)
    }
}

/// Truncated copy of a report kept in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub language: String,
    pub sentiment: String,
    pub classification: String,
    pub flags: String,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

impl From<&AnalysisReport> for HistoryEntry {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            text: format!("{}...", truncate_chars(&report.text, HISTORY_PREVIEW_CHARS)),
            language: report.language_or_unknown().to_string(),
            sentiment: report.sentiment_or_unknown().to_string(),
            classification: report.classification.label().to_string(),
            flags: join_flags(&report.flags),
            positive_pct: report.distribution.positive_pct,
            neutral_pct: report.distribution.neutral_pct,
            negative_pct: report.distribution.negative_pct,
        }
    }
}
