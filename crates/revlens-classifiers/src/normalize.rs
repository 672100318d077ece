//! Response normalization for hosted models
//!
//! Hosted models answer in several JSON shapes. Everything is mapped onto
//! the enumerated result types; nothing from upstream is passed through.
//!
//! Recognized shapes:
//! - nested scored labels: `[[{"label": "POSITIVE", "score": 0.97}, ...]]`
//! - flat list of scored labels: `[{"label": ..., "score": ...}, ...]`
//! - a single scored label: `{"label": ..., "score": ...}`
//! - generated text: `[{"generated_text": ...}]`, `{"generated_text": ...}`,
//!   or a bare string; the first non-blank line is searched for keywords
//! - part-of-speech tokens (noun level only):
//!   `[{"entity_group": "NOUN", "word": ..., "start": .., "end": ..}, ...]`

use crate::nouns::{is_pos_token, NounBreakdown};
use revlens_core::{
    AnalysisKind, AnalysisResult, Error, NounLevel, NounLevelResult, Result, Sentiment,
    SentimentResult, DEFAULT_CONFIDENCE,
};
use serde_json::Value;
use tracing::warn;

/// Positive/negative labels at or below this score are reported as neutral
const DECISION_THRESHOLD: f64 = 0.5;

const SENTIMENT_KEYWORDS: &[(&str, Sentiment)] = &[
    ("positive", Sentiment::Positive),
    ("negative", Sentiment::Negative),
    ("neutral", Sentiment::Neutral),
];

const NOUN_KEYWORDS: &[(&str, NounLevel)] = &[
    ("high", NounLevel::High),
    ("medium", NounLevel::Medium),
    ("low", NounLevel::Low),
];

/// Normalize `payload` for `kind`, using the neutral/low default when the
/// shape is not recognized.
///
/// `text` is the analysed review; part-of-speech spans index into it.
pub fn normalize(kind: AnalysisKind, payload: &Value, text: &str) -> AnalysisResult {
    try_normalize(kind, payload, text).unwrap_or_else(|e| {
        warn!(kind = %kind, error = %e, "unrecognized response, using default");
        AnalysisResult::default_for(kind)
    })
}

/// Normalize `payload` for `kind`, failing with `MalformedResponse` when no
/// known shape matches.
pub fn try_normalize(kind: AnalysisKind, payload: &Value, text: &str) -> Result<AnalysisResult> {
    match kind {
        AnalysisKind::Sentiment => try_normalize_sentiment(payload).map(AnalysisResult::Sentiment),
        AnalysisKind::NounLevel => {
            try_normalize_noun_level(payload, text).map(AnalysisResult::NounLevel)
        }
    }
}

pub fn normalize_sentiment(payload: &Value) -> SentimentResult {
    try_normalize_sentiment(payload).unwrap_or_default()
}

pub fn normalize_noun_level(payload: &Value, text: &str) -> NounLevelResult {
    try_normalize_noun_level(payload, text).unwrap_or_default()
}

pub fn try_normalize_sentiment(payload: &Value) -> Result<SentimentResult> {
    if let Some(labels) = scored_labels(payload) {
        if let Some((label, score)) = best_label(&labels, sentiment_from_label) {
            return Ok(decide_sentiment(label, score));
        }
    }

    if let Some(line) = generated_line(payload) {
        if let Some(label) = find_keyword(&line, SENTIMENT_KEYWORDS) {
            return Ok(SentimentResult::new(label, DEFAULT_CONFIDENCE));
        }
    }

    Err(Error::malformed(describe(payload)))
}

pub fn try_normalize_noun_level(payload: &Value, text: &str) -> Result<NounLevelResult> {
    if let Some(tokens) = pos_tokens(payload) {
        let breakdown = NounBreakdown::from_tokens(tokens, text);
        return Ok(NounLevelResult::from_count(breakdown.total).with_words(breakdown.words));
    }

    if let Some(labels) = scored_labels(payload) {
        if let Some((level, _)) = best_label(&labels, noun_level_from_label) {
            return Ok(NounLevelResult::new(level));
        }
    }

    if let Some(line) = generated_line(payload) {
        if let Some(level) = find_keyword(&line, NOUN_KEYWORDS) {
            return Ok(NounLevelResult::new(level));
        }
    }

    Err(Error::malformed(describe(payload)))
}

/// Part-of-speech tokens, when the payload is a (possibly empty) token list
pub fn pos_tokens(payload: &Value) -> Option<&[Value]> {
    let tokens = payload.as_array()?;
    if tokens.iter().all(is_pos_token) {
        Some(tokens.as_slice())
    } else {
        None
    }
}

/// Map a sentiment model label onto a [`Sentiment`]
pub fn sentiment_from_label(label: &str) -> Option<Sentiment> {
    match label.trim().to_ascii_lowercase().as_str() {
        "positive" | "pos" | "label_2" => Some(Sentiment::Positive),
        "negative" | "neg" | "label_0" => Some(Sentiment::Negative),
        "neutral" | "neu" | "label_1" => Some(Sentiment::Neutral),
        _ => None,
    }
}

fn noun_level_from_label(label: &str) -> Option<NounLevel> {
    match label.trim().to_ascii_lowercase().as_str() {
        "high" => Some(NounLevel::High),
        "medium" => Some(NounLevel::Medium),
        "low" => Some(NounLevel::Low),
        _ => None,
    }
}

fn decide_sentiment(label: Sentiment, score: f64) -> SentimentResult {
    match label {
        Sentiment::Positive | Sentiment::Negative if score <= DECISION_THRESHOLD => {
            SentimentResult::neutral()
        }
        _ => SentimentResult::new(label, score as f32),
    }
}

/// `(label, score)` pairs from the three scored shapes
fn scored_labels(payload: &Value) -> Option<Vec<(&str, f64)>> {
    let entries: Vec<&Value> = match payload {
        Value::Object(_) => vec![payload],
        Value::Array(items) => match items.first() {
            Some(Value::Array(inner)) => inner.iter().collect(),
            Some(_) => items.iter().collect(),
            None => return None,
        },
        _ => return None,
    };

    let labels: Vec<(&str, f64)> = entries
        .into_iter()
        .filter_map(|entry| {
            let label = entry.get("label")?.as_str()?;
            let score = entry
                .get("score")
                .and_then(Value::as_f64)
                .filter(|s| s.is_finite())
                .unwrap_or(f64::from(DEFAULT_CONFIDENCE));
            Some((label, score))
        })
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}

/// Highest-scoring entry whose label maps to a known variant
fn best_label<T>(labels: &[(&str, f64)], map: impl Fn(&str) -> Option<T>) -> Option<(T, f64)> {
    labels
        .iter()
        .filter_map(|&(label, score)| map(label).map(|mapped| (mapped, score)))
        .fold(None, |best: Option<(T, f64)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
}

/// First non-blank line of a generated completion, lowercased
fn generated_line(payload: &Value) -> Option<String> {
    let generated = match payload {
        Value::String(text) => text.as_str(),
        Value::Object(_) => payload.get("generated_text")?.as_str()?,
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("generated_text").and_then(Value::as_str))?,
        _ => return None,
    };

    generated
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_lowercase)
}

/// First keyword, in priority order, present as a whole word in `line`
fn find_keyword<T: Copy>(line: &str, keywords: &[(&str, T)]) -> Option<T> {
    let words: Vec<&str> = line
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    keywords
        .iter()
        .find(|(keyword, _)| words.contains(keyword))
        .map(|&(_, value)| value)
}

fn describe(payload: &Value) -> String {
    let mut text = payload.to_string();
    if text.len() > 120 {
        let mut cut = 120;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    format!("unrecognized payload {text}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sentiment(payload: Value) -> SentimentResult {
        normalize_sentiment(&payload)
    }

    fn noun_level(payload: Value) -> NounLevelResult {
        normalize_noun_level(&payload, "")
    }

    #[test]
    fn test_nested_scored_labels() {
        let result = sentiment(json!([[{"label": "POSITIVE", "score": 0.97}]]));
        assert_eq!(result.label, Sentiment::Positive);
        assert!((result.confidence - 0.97).abs() < 1e-6);
    }

    #[test]
    fn test_nested_picks_highest_score() {
        let result = sentiment(json!([[
            {"label": "NEGATIVE", "score": 0.12},
            {"label": "POSITIVE", "score": 0.88}
        ]]));
        assert_eq!(result.label, Sentiment::Positive);
        assert!((result.confidence - 0.88).abs() < 1e-6);
    }

    #[test]
    fn test_flat_object() {
        let result = sentiment(json!({"label": "NEGATIVE", "score": 0.81}));
        assert_eq!(result.label, Sentiment::Negative);
        assert!((result.confidence - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_flat_list_with_numbered_labels() {
        let result = sentiment(json!([
            {"label": "LABEL_0", "score": 0.05},
            {"label": "LABEL_1", "score": 0.15},
            {"label": "LABEL_2", "score": 0.80}
        ]));
        assert_eq!(result.label, Sentiment::Positive);
    }

    #[test]
    fn test_low_score_polarity_is_neutral() {
        let result = sentiment(json!([[{"label": "POSITIVE", "score": 0.5}]]));
        assert_eq!(result, SentimentResult::neutral());
    }

    #[test]
    fn test_generated_text_sentiment() {
        let result = sentiment(json!([{"generated_text": "\n Negative.\nThe reviewer is unhappy."}]));
        assert_eq!(result.label, Sentiment::Negative);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_generated_text_priority_order() {
        let result = sentiment(json!("neutral, leaning positive"));
        assert_eq!(result.label, Sentiment::Positive);
    }

    #[test]
    fn test_free_text_noun_level() {
        assert_eq!(noun_level(json!("medium nouns detected")).level, NounLevel::Medium);
        assert_eq!(
            noun_level(json!({"generated_text": "High (>15 nouns)"})).level,
            NounLevel::High
        );
    }

    #[test]
    fn test_free_text_needs_whole_words() {
        let result = try_normalize_noun_level(&json!("below average, allowed"), "");
        assert!(result.is_err());
    }

    #[test]
    fn test_scored_noun_labels() {
        let result = noun_level(json!([{"label": "low", "score": 0.2}, {"label": "high", "score": 0.7}]));
        assert_eq!(result, NounLevelResult::new(NounLevel::High));
    }

    #[test]
    fn test_pos_tokens_are_counted() {
        let text = "The blender and the lid";
        let payload = json!([
            {"entity_group": "DET", "word": "the", "start": 0, "end": 3},
            {"entity_group": "NOUN", "word": "blender", "start": 4, "end": 11},
            {"entity_group": "CCONJ", "word": "and", "start": 12, "end": 15},
            {"entity_group": "NOUN", "word": "lid", "start": 20, "end": 23}
        ]);
        let result = normalize_noun_level(&payload, text);
        assert_eq!(
            result,
            NounLevelResult::from_count(2)
                .with_words(vec![("blender".to_string(), 1), ("lid".to_string(), 1)])
        );
        assert_eq!(result.level, NounLevel::Low);
    }

    #[test]
    fn test_pos_spans_are_character_offsets() {
        let text = "Crème brûlée jar, jar lid";
        let payload = json!([
            {"entity_group": "NOUN", "word": "creme", "start": 0, "end": 5},
            {"entity_group": "NOUN", "word": "brulee", "start": 6, "end": 12},
            {"entity_group": "NOUN", "word": "jar", "start": 13, "end": 16},
            {"entity_group": "NOUN", "word": "jar", "start": 18, "end": 21},
            {"entity_group": "NOUN", "word": "lid", "start": 22, "end": 25}
        ]);
        let result = normalize_noun_level(&payload, text);
        assert_eq!(result.count, Some(5));
        assert_eq!(
            result.words,
            vec![
                ("jar".to_string(), 2),
                ("Crème".to_string(), 1),
                ("brûlée".to_string(), 1),
                ("lid".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_unrecognized_shapes_use_defaults() {
        for payload in [
            json!({}),
            json!([]),
            json!(null),
            json!(42),
            json!([[]]),
            json!({"error": "Model is loading"}),
            json!([{"label": "FIVE_STARS", "score": 0.9}]),
        ] {
            assert_eq!(sentiment(payload.clone()), SentimentResult::neutral(), "{payload}");
        }
        assert_eq!(noun_level(json!({})), NounLevelResult::new(NounLevel::Low));
        assert_eq!(noun_level(json!("nothing useful")).level, NounLevel::Low);
    }

    #[test]
    fn test_try_normalize_reports_malformed() {
        let err = try_normalize(AnalysisKind::Sentiment, &json!({}), "").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_normalize_dispatches_on_kind() {
        let payload = json!([[{"label": "NEGATIVE", "score": 0.9}]]);
        let result = normalize(AnalysisKind::Sentiment, &payload, "");
        assert_eq!(result.kind(), AnalysisKind::Sentiment);

        let result = normalize(AnalysisKind::NounLevel, &payload, "");
        assert_eq!(result, AnalysisResult::NounLevel(NounLevelResult::default()));
    }
}
