//! Noun counting: a vocabulary/suffix heuristic for offline use, and a
//! summary of part-of-speech tokens returned by token-classification models.

use serde_json::Value;
use std::collections::HashMap;

/// Common nouns in product reviews
pub const NOUN_VOCABULARY: &[&str] = &[
    "arrival",
    "bottle",
    "child",
    "coconut",
    "company",
    "customer",
    "daughter",
    "delivery",
    "experience",
    "feature",
    "film",
    "formula",
    "friend",
    "hint",
    "item",
    "money",
    "packaging",
    "pineapple",
    "price",
    "process",
    "product",
    "purchase",
    "quality",
    "recommendation",
    "refund",
    "response",
    "sample",
    "service",
    "smell",
    "support",
    "taste",
    "value",
    "water",
];

/// Endings that almost always mark an English noun
pub const NOUN_SUFFIXES: &[&str] = &["tion", "ment", "ness", "ity", "ance", "ence"];

/// Tags counted as nouns in part-of-speech output
const NOUN_TAGS: &[&str] = &["NOUN", "PROPN"];

/// Words shorter than this are never counted
const MIN_WORD_LEN: usize = 3;

/// Count nouns with the offline heuristic.
///
/// Each whitespace-separated word is lowercased and stripped to `a-z`. A
/// word counts if it is in [`NOUN_VOCABULARY`] (optionally with a plural
/// `s`) or ends in one of [`NOUN_SUFFIXES`].
pub fn count_nouns(text: &str) -> usize {
    text.split_whitespace()
        .map(clean_word)
        .filter(|word| word.len() >= MIN_WORD_LEN && is_noun(word))
        .count()
}

fn clean_word(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .collect()
}

fn is_noun(word: &str) -> bool {
    in_vocabulary(word)
        || word
            .strip_suffix('s')
            .is_some_and(in_vocabulary)
        || NOUN_SUFFIXES.iter().any(|suffix| word.ends_with(suffix))
}

fn in_vocabulary(word: &str) -> bool {
    NOUN_VOCABULARY.binary_search(&word).is_ok()
}

/// Per-word noun tally from part-of-speech tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NounBreakdown {
    pub total: usize,
    /// `(surface form, count)`, most frequent first, ties alphabetical
    pub words: Vec<(String, usize)>,
}

impl NounBreakdown {
    /// Tally NOUN/PROPN tokens.
    ///
    /// Tokens carry their tag in `entity_group`, `entity`, or `tag`. The
    /// surface form comes from the `start..end` span of `text` when it is
    /// valid, else from `word` with sub-word markers removed. Tokens with no
    /// surface form are skipped. Words are grouped case-insensitively; the
    /// first spelling seen is kept.
    pub fn from_tokens(tokens: &[Value], text: &str) -> Self {
        let mut counts: HashMap<String, (String, usize)> = HashMap::new();
        let mut total = 0;

        for token in tokens {
            if !is_noun_token(token) {
                continue;
            }
            let Some(surface) = surface_form(token, text) else {
                continue;
            };
            total += 1;
            counts
                .entry(surface.to_lowercase())
                .or_insert_with(|| (surface, 0))
                .1 += 1;
        }

        let mut words: Vec<(String, usize)> = counts.into_values().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self { total, words }
    }
}

/// Whether a JSON value looks like a part-of-speech token
pub fn is_pos_token(value: &Value) -> bool {
    token_tag(value).is_some()
}

fn token_tag(token: &Value) -> Option<&str> {
    ["entity_group", "entity", "tag"]
        .iter()
        .find_map(|key| token.get(*key).and_then(Value::as_str))
}

fn is_noun_token(token: &Value) -> bool {
    token_tag(token).is_some_and(|tag| {
        NOUN_TAGS
            .iter()
            .any(|noun| tag.eq_ignore_ascii_case(noun))
    })
}

fn surface_form(token: &Value, text: &str) -> Option<String> {
    let start = token.get("start").and_then(Value::as_u64);
    let end = token.get("end").and_then(Value::as_u64);
    if let (Some(start), Some(end)) = (start, end) {
        let span = usize::try_from(start)
            .ok()
            .zip(usize::try_from(end).ok())
            .and_then(|(start, end)| char_span(text, start, end))
            .map(str::trim);
        if let Some(span) = span.filter(|s| !s.is_empty()) {
            return Some(span.to_string());
        }
    }

    let word = token.get("word").and_then(Value::as_str)?;
    let word = word.trim_start_matches("##").trim_start_matches('Ġ').trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_string())
    }
}

/// Slice `text` by character offsets, as token-classification models report them
fn char_span(text: &str, start: usize, end: usize) -> Option<&str> {
    if start >= end {
        return None;
    }
    let mut offsets = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));
    let begin = offsets.nth(start)?;
    let finish = offsets.nth(end - start - 1)?;
    text.get(begin..finish)
}
