//! # news_credibility
//!
//! Automated credibility report for a news article: detected language,
//! sentiment breakdown, an extractive summary, and heuristic red flags
//! (clickbait phrasing, emotionally charged language, satire and
//! fake-news cues).
//!
//! ## Architecture
//!
//! 1. **Input**: pasted text, a file, stdin, or a URL fetched by [`extractor`]
//! 2. **Heuristics**: [`heuristics::detect_red_flags`] and
//!    [`heuristics::classify_article`], pure functions over the raw text
//! 3. **Provider**: language, sentiment and summary from the hosted language
//!    service ([`provider`]), memoized by [`cache::TtlCache`]
//! 4. **Aggregation**: [`sentiment::aggregate`] turns sentence labels into percentages
//! 5. **Report**: [`analyzer::Analyzer`] assembles the report and appends it to the
//!    session [`history::SessionHistory`]; [`outputs`] renders both

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod extractor;
pub mod heuristics;
pub mod history;
pub mod models;
pub mod outputs;
pub mod provider;
pub mod sentiment;
pub mod utils;

pub use heuristics::{classify_article, detect_red_flags};
pub use sentiment::aggregate;
