//! Terminal rendering of results

use crate::state::TokenStatus;
use revlens_core::{
    Analysis, AnalysisResult, NounLevel, NounLevelResult, Origin, Review, ReviewOrigin,
    ReviewSource, Sentiment, SentimentResult,
};

pub fn render_analysis(analysis: &Analysis) -> String {
    let line = match &analysis.result {
        AnalysisResult::Sentiment(sentiment) => render_sentiment(sentiment),
        AnalysisResult::NounLevel(nouns) => render_noun_level(nouns),
    };
    match analysis.origin {
        Origin::Remote => line,
        Origin::Local => format!("{line} [local]"),
    }
}

pub fn render_sentiment(result: &SentimentResult) -> String {
    let percent = result.confidence * 100.0;
    match result.label {
        Sentiment::Positive => format!("👍 Positive ({percent:.1}%)"),
        Sentiment::Negative => format!("👎 Negative ({percent:.1}%)"),
        Sentiment::Neutral => "❓ Neutral".to_string(),
    }
}

pub fn render_noun_level(result: &NounLevelResult) -> String {
    let label = match result.level {
        NounLevel::High => "🟢 High (>15 nouns)",
        NounLevel::Medium => "🟡 Medium (6-15 nouns)",
        NounLevel::Low => "🔴 Low (<6 nouns)",
    };
    match result.count {
        Some(0) => format!("{label}: No nouns detected"),
        Some(1) => format!("{label}: 1 noun detected{}", render_noun_words(&result.words)),
        Some(count) => format!(
            "{label}: {count} nouns detected{}",
            render_noun_words(&result.words)
        ),
        None => label.to_string(),
    }
}

/// Most frequent nouns shown after the count
const SHOWN_NOUNS: usize = 5;

fn render_noun_words(words: &[(String, usize)]) -> String {
    if words.is_empty() {
        return String::new();
    }
    let shown: Vec<String> = words
        .iter()
        .take(SHOWN_NOUNS)
        .map(|(word, n)| format!("{word} ({n})"))
        .collect();
    let mut line = format!(" • {}", shown.join(", "));
    if words.len() > SHOWN_NOUNS {
        line.push_str(&format!(", +{} more", words.len() - SHOWN_NOUNS));
    }
    line
}

pub fn render_review(review: &Review) -> String {
    format!("\"{}\"", review.text())
}

/// One line describing where the reviews came from
pub fn render_source(source: &ReviewSource) -> String {
    let from = match source.origin() {
        ReviewOrigin::File(path) => path.display().to_string(),
        ReviewOrigin::Url(url) => url.clone(),
        ReviewOrigin::Samples => "built-in samples".to_string(),
        ReviewOrigin::Memory => "provided list".to_string(),
    };
    format!("{} reviews from {from}", source.len())
}

pub fn render_token_status(status: &TokenStatus) -> String {
    match status {
        TokenStatus::Absent => "No API token configured; requests are unauthenticated".to_string(),
        TokenStatus::Stored(path) => format!("API token stored in {}", path.display()),
        TokenStatus::Override => "API token supplied for this run (REVLENS_TOKEN)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_sentiment_lines() {
        let positive = Analysis::remote(AnalysisResult::Sentiment(SentimentResult::new(
            Sentiment::Positive,
            0.97,
        )));
        assert_eq!(render_analysis(&positive), "👍 Positive (97.0%)");

        let negative = Analysis::local(AnalysisResult::Sentiment(SentimentResult::new(
            Sentiment::Negative,
            0.81,
        )));
        assert_eq!(render_analysis(&negative), "👎 Negative (81.0%) [local]");

        assert_eq!(render_sentiment(&SentimentResult::neutral()), "❓ Neutral");
    }

    #[test]
    fn test_noun_lines() {
        assert_eq!(
            render_noun_level(&NounLevelResult::new(NounLevel::High)),
            "🟢 High (>15 nouns)"
        );
        assert_eq!(
            render_noun_level(&NounLevelResult::from_count(8)),
            "🟡 Medium (6-15 nouns): 8 nouns detected"
        );
        assert_eq!(
            render_noun_level(&NounLevelResult::from_count(1)),
            "🔴 Low (<6 nouns): 1 noun detected"
        );
        assert_eq!(
            render_noun_level(&NounLevelResult::from_count(0)),
            "🔴 Low (<6 nouns): No nouns detected"
        );
    }

    fn words(list: &[(&str, usize)]) -> Vec<(String, usize)> {
        list.iter().map(|(w, n)| (w.to_string(), *n)).collect()
    }

    #[test]
    fn test_noun_breakdown_is_listed() {
        let result = NounLevelResult::from_count(3).with_words(words(&[("jar", 2), ("lid", 1)]));
        assert_eq!(
            render_noun_level(&result),
            "🔴 Low (<6 nouns): 3 nouns detected • jar (2), lid (1)"
        );
    }

    #[test]
    fn test_noun_breakdown_is_capped() {
        let result = NounLevelResult::from_count(9).with_words(words(&[
            ("blender", 3),
            ("lid", 1),
            ("motor", 1),
            ("pitcher", 1),
            ("price", 1),
            ("seal", 1),
            ("warranty", 1),
        ]));
        let analysis = Analysis::remote(AnalysisResult::NounLevel(result));
        assert_eq!(
            render_analysis(&analysis),
            "🟡 Medium (6-15 nouns): 9 nouns detected • blender (3), lid (1), motor (1), \
             pitcher (1), price (1), +2 more"
        );
    }

    #[test]
    fn test_source_and_token_lines() {
        assert_eq!(
            render_source(&ReviewSource::samples()),
            "10 reviews from built-in samples"
        );
        assert_eq!(
            render_token_status(&TokenStatus::Stored(PathBuf::from("/tmp/c.json"))),
            "API token stored in /tmp/c.json"
        );
        assert_eq!(render_review(&Review::new("Nice")), "\"Nice\"");
        assert_eq!(
            render_source(&ReviewSource::from_reviews(vec![Review::new("Nice")])),
            "1 reviews from provided list"
        );
    }
}
