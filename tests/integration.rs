use news_credibility::heuristics::assess;
use news_credibility::models::{Classification, RedFlag, SentenceSentiment, Sentiment};
use news_credibility::{aggregate, classify_article, detect_red_flags};

#[test]
fn plain_text_has_no_signals() {
    let text = "El Banco Central mantuvo los tipos de interés en su reunión de marzo. \
                La decisión estaba prevista por los analistas consultados.";
    assert_eq!(detect_red_flags(text), vec![RedFlag::NoSignals]);
    assert_eq!(classify_article(text), Classification::Informative);
}

#[test]
fn bias_word_flagged_exactly_once() {
    let flags = detect_red_flags("Esto es un escándalo nacional");
    assert_eq!(
        flags.iter().filter(|f| **f == RedFlag::BiasedLanguage).count(),
        1
    );

    let flags = detect_red_flags("Un gobierno corrupto, una dictadura, una traición y una vergüenza");
    assert_eq!(flags, vec![RedFlag::BiasedLanguage]);
}

#[test]
fn satire_overrides_fake_news_and_clickbait() {
    let text = "Esta noticia es pura parodia y humor";
    assert_eq!(classify_article(text), Classification::Satire);

    let text = "No creerás esta parodia: circula un rumor falso y viral";
    assert_eq!(classify_article(text), Classification::Satire);
}

#[test]
fn fake_news_without_satire() {
    let text = "Circula un bulo sobre el cierre de los bancos";
    assert_eq!(classify_article(text), Classification::FakeNews);
}

#[test]
fn clickbait_with_satire_is_never_clickbait_label() {
    let text = "Impactante: el secreto que nadie te contó, según El Mundo Today (elmundotoday)";
    let verdict = assess(text);
    assert!(verdict.flags.contains(&RedFlag::Clickbait));
    assert_eq!(verdict.classification, Classification::Satire);
}

#[test]
fn aggregate_spec_example() {
    let sentences = vec![
        SentenceSentiment::new("a", Sentiment::Positive),
        SentenceSentiment::new("b", Sentiment::Positive),
        SentenceSentiment::new("c", Sentiment::Neutral),
        SentenceSentiment::new("d", Sentiment::Negative),
    ];
    let dist = aggregate(&sentences);
    assert_eq!(dist.positive_pct, 50.0);
    assert_eq!(dist.neutral_pct, 25.0);
    assert_eq!(dist.negative_pct, 25.0);
}

#[test]
fn aggregate_empty_is_zero() {
    let dist = aggregate(&[]);
    assert_eq!(
        (dist.positive_pct, dist.neutral_pct, dist.negative_pct),
        (0.0, 0.0, 0.0)
    );
}

#[test]
fn heuristics_are_repeatable() {
    let text = "ALERTA: un vídeo alucinante muestra un ataque terrible";
    let first = assess(text);
    for _ in 0..5 {
        assert_eq!(assess(text), first);
    }
    assert_eq!(first.flags, vec![RedFlag::Clickbait, RedFlag::BiasedLanguage]);
    assert_eq!(first.classification, Classification::ClickbaitInformative);
}
