//! Orchestration of one analysis session.
//!
//! The [`Analyzer`] owns everything with state: the memoizing caches in
//! front of the provider and the extractor, the current report slot and the
//! session history. The heuristics it calls stay pure.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::extractor::{ExtractError, TextExtractor};
use crate::heuristics::assess;
use crate::history::SessionHistory;
use crate::models::{AnalysisReport, HistoryEntry, NlpAnalysis, join_flags};
use crate::provider::{ProviderError, TextAnalytics};
use crate::sentiment::aggregate;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("no hay texto que analizar")]
    EmptyText,
    #[error("no se pudo analizar el texto: {0}")]
    Provider(#[from] ProviderError),
}

/// Session-scoped analysis pipeline.
#[derive(Debug)]
pub struct Analyzer<P, E> {
    provider: P,
    extractor: E,
    analysis_cache: TtlCache<String, NlpAnalysis>,
    extraction_cache: TtlCache<String, String>,
    current: Option<AnalysisReport>,
    history: SessionHistory,
}

impl<P, E> Analyzer<P, E>
where
    P: TextAnalytics,
    E: TextExtractor,
{
    pub fn new(provider: P, extractor: E, cache: &CacheConfig) -> Self {
        Self {
            provider,
            extractor,
            analysis_cache: TtlCache::new(cache.analysis_ttl_secs),
            extraction_cache: TtlCache::new(cache.extraction_ttl_secs),
            current: None,
            history: SessionHistory::new(),
        }
    }

    /// Article text behind `url`, served from cache when fetched recently.
    ///
    /// Failures are not cached.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_text(&mut self, url: &str) -> Result<String, ExtractError> {
        let key = url.trim().to_string();
        if let Some(text) = self.extraction_cache.get(&key) {
            debug!("Extraction cache hit");
            return Ok(text);
        }
        let text = self.extractor.extract(&key).await?;
        self.extraction_cache.insert(key, text.clone());
        Ok(text)
    }

    async fn nlp(&mut self, text: &str) -> Result<NlpAnalysis, ProviderError> {
        let key = text.to_string();
        if let Some(analysis) = self.analysis_cache.get(&key) {
            debug!("Analysis cache hit");
            return Ok(analysis);
        }
        let analysis = self.provider.analyze(text).await?;
        self.analysis_cache.insert(key, analysis.clone());
        Ok(analysis)
    }

    /// Analyze `text` and record the result.
    ///
    /// On success the report becomes the current report and a truncated copy
    /// is appended to the history. When the provider fails nothing is
    /// recorded; the heuristic verdict is still logged.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub async fn analyze(&mut self, text: &str) -> Result<AnalysisReport, AnalyzeError> {
        if text.trim().is_empty() {
            return Err(AnalyzeError::EmptyText);
        }

        let verdict = assess(text);

        let nlp = match self.nlp(text).await {
            Ok(nlp) => nlp,
            Err(e) => {
                warn!(
                    error = %e,
                    classification = %verdict.classification,
                    flags = %join_flags(&verdict.flags),
                    "Provider analysis failed; report not recorded"
                );
                return Err(e.into());
            }
        };

        let distribution = aggregate(&nlp.sentences);
        let report = AnalysisReport {
            analyzed_at: Utc::now(),
            text: text.to_string(),
            language: nlp.language,
            language_code: nlp.language_code,
            sentiment: nlp.sentiment,
            summary: nlp.summary,
            sentences: nlp.sentences,
            flags: verdict.flags,
            classification: verdict.classification,
            distribution,
        };

        self.history.push(HistoryEntry::from(&report));
        self.current = Some(report.clone());

        info!(
            classification = %report.classification,
            language = %report.language_or_unknown(),
            positive_pct = distribution.positive_pct,
            neutral_pct = distribution.neutral_pct,
            negative_pct = distribution.negative_pct,
            history_len = self.history.len(),
            "Analysis complete"
        );
        Ok(report)
    }

    pub fn current(&self) -> Option<&AnalysisReport> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }
}
