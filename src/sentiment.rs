//! Aggregation of sentence-level sentiment into a percentage distribution.

use itertools::Itertools;

use crate::models::{SentenceSentiment, Sentiment, SentimentDistribution};
use crate::utils::round1;

/// Compute the share of positive, neutral and negative sentences.
///
/// Each bucket is `count / total * 100` rounded to one decimal, half away
/// from zero. Labels outside the three buckets (such as `mixed`) still count
/// towards the total but towards no bucket. An empty list yields all zeros.
pub fn aggregate(sentences: &[SentenceSentiment]) -> SentimentDistribution {
    let total = sentences.len();
    if total == 0 {
        return SentimentDistribution::default();
    }

    let counts = sentences.iter().map(|s| s.sentiment).counts();
    let pct = |label: Sentiment| {
        let count = counts.get(&label).copied().unwrap_or(0);
        round1(count as f64 / total as f64 * 100.0)
    };

    SentimentDistribution {
        positive_pct: pct(Sentiment::Positive),
        neutral_pct: pct(Sentiment::Neutral),
        negative_pct: pct(Sentiment::Negative),
    }
}
