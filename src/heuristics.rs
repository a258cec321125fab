//! Heuristic red-flag detection and article classification.
//!
//! Both functions are pure: they read the text against static pattern lists
//! compiled once on first use and never hold state between calls.
//!
//! # Pattern groups
//!
//! | Group | Matching | Used by |
//! |-------|----------|---------|
//! | Clickbait | case-insensitive regex, anywhere | [`detect_red_flags`], [`classify_article`] |
//! | Bias words | case-insensitive, whole word | [`detect_red_flags`] |
//! | Satire cues | substring of the lowercased text | [`classify_article`] |
//! | Fake-news cues | substring of the lowercased text | [`classify_article`] |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{Classification, RedFlag};

/// Flags and classification of one text, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub flags: Vec<RedFlag>,
    pub classification: Classification,
}

/// Run both heuristics over `text`.
pub fn assess(text: &str) -> Verdict {
    Verdict {
        flags: detect_red_flags(text),
        classification: classify_article(text),
    }
}

/// Phrasing typical of sensationalist headlines.
pub const CLICKBAIT_PATTERNS: &[&str] = &[
    r"no creer[aá]s",
    r"no te imaginas",
    r"te sorprender[aá]",
    r"incre[ií]ble",
    r"impactante",
    r"asombroso",
    r"alucinante",
    r"impresionante",
    r"lo que pas[oó]",
    r"esto cambiar[aá] tu vida",
    r"tienes que ver esto",
    r"no sab[ií]as que",
    r"lo que nadie te dijo",
    r"el secreto que",
    r"inesperado",
    r"sorprendente",
    r"revelado",
    r"nadie se esperaba",
    r"se volvió viral",
    r"viral",
    r"alerta",
    r"última hora",
    r"urgente",
    r"lo que descubrieron",
    r"te dejar[aá] sin palabras",
    r"as[ií] reaccion[oó]",
    r"mira c[oó]mo",
    r"quedarás helado",
    r"descubre la verdad",
    r"mira lo que hizo",
    r"así fue",
    r"el resultado te sorprenderá",
];

/// Words signalling emotional, moralizing or ideological framing.
pub const BIAS_WORDS: &[&str] = &[
    // negative
    "terrible",
    "escándalo",
    "escandaloso",
    "vergonzoso",
    "indignante",
    "pésimo",
    "desastroso",
    "atroz",
    "criminal",
    "repugnante",
    "horrible",
    // extreme positive
    "brillante",
    "fantástico",
    "maravilloso",
    "glorioso",
    "épico",
    "extraordinario",
    // polarization and ideology
    "corrupto",
    "manipulado",
    "adoctrinamiento",
    "propaganda",
    "dictadura",
    "traición",
    "patriota",
    "antipatriota",
    // moralizing
    "vergüenza",
    "culpa",
    "héroe",
    "villano",
    "peligroso",
    "amenaza",
];

/// Literal cues of humor or parody. Matched against lowercased text.
pub const SATIRE_CUES: &[&str] = &[
    "parodia",
    "broma",
    "humor",
    "satírico",
    "elmundotoday",
    "rocambolesco",
    "ficción humorística",
    "sarcasmo",
    "ironía",
    "burla",
    "chiste",
];

/// Literal cues of hoaxes and misinformation. Matched against lowercased text.
pub const FAKE_NEWS_CUES: &[&str] = &[
    "fake",
    "engaño",
    "mentira",
    "falso",
    "desinformación",
    "hoax",
    "estafa",
    "conspiración",
    "bulo",
    "manipulado",
    "inventado",
    // verbs common in hoaxes
    "difunden",
    "circula un rumor",
    "cadena de whatsapp",
];

static CLICKBAIT_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)(?:{})", CLICKBAIT_PATTERNS.join("|"));
    Regex::new(&pattern).expect("clickbait patterns must compile")
});

// `\b` is Unicode-aware, so "escándalo" is a single word and "culpable"
// does not match "culpa".
static BIAS_RE: Lazy<Regex> = Lazy::new(|| {
    let words = BIAS_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{words})\b")).expect("bias words must compile")
});

/// Detect clickbait phrasing and biased language in `text`.
///
/// Each group contributes at most one flag, in group order. When nothing
/// matches the result is the single [`RedFlag::NoSignals`] sentinel, so the
/// returned list is never empty.
///
/// # Examples
///
/// ```
/// use news_credibility::heuristics::detect_red_flags;
/// use news_credibility::models::RedFlag;
///
/// let flags = detect_red_flags("Esto es un escándalo nacional");
/// assert_eq!(flags, vec![RedFlag::BiasedLanguage]);
/// ```
pub fn detect_red_flags(text: &str) -> Vec<RedFlag> {
    let mut flags = Vec::with_capacity(2);

    if CLICKBAIT_RE.is_match(text) {
        flags.push(RedFlag::Clickbait);
    }
    if BIAS_RE.is_match(text) {
        flags.push(RedFlag::BiasedLanguage);
    }

    if flags.is_empty() {
        flags.push(RedFlag::NoSignals);
    }
    flags
}

/// Assign exactly one [`Classification`] to `text`.
///
/// Cue groups are checked in priority order and the first match wins:
/// satire, then fake news, then clickbait. Text matching none of them is
/// [`Classification::Informative`].
pub fn classify_article(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    if SATIRE_CUES.iter().any(|cue| lowered.contains(cue)) {
        return Classification::Satire;
    }
    if FAKE_NEWS_CUES.iter().any(|cue| lowered.contains(cue)) {
        return Classification::FakeNews;
    }
    if CLICKBAIT_RE.is_match(&lowered) {
        return Classification::ClickbaitInformative;
    }
    Classification::Informative
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEUTRAL: &str = "El ayuntamiento aprobó ayer el presupuesto municipal \
                           para el próximo año tras una sesión de tres horas.";

    #[test]
    fn test_neutral_text_has_no_signals() {
        assert_eq!(detect_red_flags(NEUTRAL), vec![RedFlag::NoSignals]);
        assert_eq!(classify_article(NEUTRAL), Classification::Informative);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(detect_red_flags(""), vec![RedFlag::NoSignals]);
        assert_eq!(classify_article(""), Classification::Informative);
    }

    #[test]
    fn test_bias_word_flagged_once() {
        let flags = detect_red_flags("Un escándalo terrible, vergonzoso y atroz");
        assert_eq!(flags, vec![RedFlag::BiasedLanguage]);
    }

    #[test]
    fn test_bias_word_case_insensitive() {
        let flags = detect_red_flags("ESCÁNDALO EN EL CONGRESO");
        assert_eq!(flags, vec![RedFlag::BiasedLanguage]);
    }

    #[test]
    fn test_bias_word_requires_whole_word() {
        // "culpable" contains "culpa", "amenazante" contains "amenaza"
        let flags = detect_red_flags("El jurado lo declaró culpable de una conducta amenazante");
        assert_eq!(flags, vec![RedFlag::NoSignals]);
    }

    #[test]
    fn test_bias_word_next_to_punctuation() {
        let flags = detect_red_flags("¡Qué vergüenza!");
        assert_eq!(flags, vec![RedFlag::BiasedLanguage]);
    }

    #[test]
    fn test_clickbait_flagged_once() {
        let flags = detect_red_flags("No creerás lo que pasó: un vídeo impactante se volvió viral");
        assert_eq!(flags, vec![RedFlag::Clickbait]);
    }

    #[test]
    fn test_clickbait_accent_variants() {
        assert_eq!(detect_red_flags("NO CREERAS esto"), vec![RedFlag::Clickbait]);
        assert_eq!(detect_red_flags("Algo increible"), vec![RedFlag::Clickbait]);
    }

    #[test]
    fn test_both_groups_in_order() {
        let flags = detect_red_flags("Última hora: un escándalo sacude el gobierno");
        assert_eq!(flags, vec![RedFlag::Clickbait, RedFlag::BiasedLanguage]);
    }

    #[test]
    fn test_satire_wins_over_everything() {
        let text = "Esta noticia es pura parodia y humor: un bulo impactante";
        assert_eq!(classify_article(text), Classification::Satire);
    }

    #[test]
    fn test_satire_wins_over_clickbait() {
        let text = "¡Última hora! Un chiste sobre el tiempo se vuelve noticia";
        assert_eq!(classify_article(text), Classification::Satire);
    }

    #[test]
    fn test_fake_news_cue() {
        let text = "Circula un bulo sobre la vacuna en redes sociales";
        assert_eq!(classify_article(text), Classification::FakeNews);
    }

    #[test]
    fn test_fake_news_case_insensitive() {
        assert_eq!(classify_article("Es FALSO que cierren los colegios"), Classification::FakeNews);
    }

    #[test]
    fn test_clickbait_classification() {
        let text = "Mira cómo reaccionó el público al anuncio";
        assert_eq!(classify_article(text), Classification::ClickbaitInformative);
    }

    #[test]
    fn test_clickbait_classification_uppercase() {
        let text = "URGENTE: cortes de luz en la ciudad";
        assert_eq!(classify_article(text), Classification::ClickbaitInformative);
    }

    #[test]
    fn test_assess_combines_both() {
        let verdict = assess("Última hora: un escándalo, según fuentes que difunden el rumor");
        assert_eq!(verdict.flags, vec![RedFlag::Clickbait, RedFlag::BiasedLanguage]);
        assert_eq!(verdict.classification, Classification::FakeNews);
    }

    #[test]
    fn test_idempotent() {
        let text = "Alerta: un escándalo que nadie se esperaba";
        assert_eq!(detect_red_flags(text), detect_red_flags(text));
        assert_eq!(classify_article(text), classify_article(text));
    }
}
