//! Markdown rendering of reports, heuristic verdicts and the session history.

use std::fmt::Write;

use crate::heuristics::Verdict;
use crate::history::SessionHistory;
use crate::models::{AnalysisReport, join_flags};

/// Render the full report for one analyzed text.
pub fn report_to_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();
    let d = &report.distribution;

    writeln!(md, "## 📋 Informe de Análisis\n").unwrap();
    writeln!(md, "**Idioma detectado:** {}  ", report.language_or_unknown()).unwrap();
    writeln!(md, "**Sentimiento global:** {}  ", report.sentiment_or_unknown()).unwrap();
    writeln!(md, "**Clasificación heurística:** {}\n", report.classification).unwrap();

    writeln!(md, "### 💯 Distribución de sentimientos en el texto\n").unwrap();
    writeln!(md, "- 🟢 **Positivas:** {:.1}%", d.positive_pct).unwrap();
    writeln!(md, "- 🟡 **Neutras:** {:.1}%", d.neutral_pct).unwrap();
    writeln!(md, "- 🔴 **Negativas:** {:.1}%\n", d.negative_pct).unwrap();

    writeln!(md, "### 🧩 Resumen\n").unwrap();
    writeln!(md, "> {}\n", report.summary.trim()).unwrap();

    if !report.sentences.is_empty() {
        writeln!(md, "### 💬 Evidencias de sentimiento\n").unwrap();
        for s in &report.sentences {
            writeln!(md, "- {} *{}*: {}", s.sentiment.emoji(), s.sentiment, s.text.trim()).unwrap();
        }
        md.push('\n');
    }

    writeln!(md, "### ⚠️ Red Flags\n").unwrap();
    writeln!(md, "{}", join_flags(&report.flags)).unwrap();
    md
}

/// Render the heuristic verdict alone, used when the provider is skipped.
pub fn verdict_to_markdown(verdict: &Verdict) -> String {
    let mut md = String::new();
    writeln!(md, "## 📋 Análisis heurístico\n").unwrap();
    writeln!(md, "**Clasificación heurística:** {}\n", verdict.classification).unwrap();
    writeln!(md, "### ⚠️ Red Flags\n").unwrap();
    writeln!(md, "{}", join_flags(&verdict.flags)).unwrap();
    md
}

/// Render the history, most recent analysis first.
pub fn history_to_markdown(history: &SessionHistory) -> String {
    let mut md = String::new();
    writeln!(md, "## 🕓 Historial de análisis anteriores\n").unwrap();

    if history.is_empty() {
        writeln!(md, "Aún no hay análisis guardados.").unwrap();
        return md;
    }

    for (i, h) in history.newest_first().enumerate() {
        writeln!(md, "**{}.** 🗞️ *{}*\n", i + 1, h.text).unwrap();
        writeln!(md, "- Idioma: {}", h.language).unwrap();
        writeln!(md, "- Sentimiento global: {}", h.sentiment).unwrap();
        writeln!(
            md,
            "- 🟢 Positivas: {:.1}% | 🟡 Neutras: {:.1}% | 🔴 Negativas: {:.1}%",
            h.positive_pct, h.neutral_pct, h.negative_pct
        )
        .unwrap();
        writeln!(md, "- Clasificación: {}", h.classification).unwrap();
        writeln!(md, "- Red Flags: {}\n", h.flags).unwrap();
        writeln!(md, "---\n").unwrap();
    }
    md
}
