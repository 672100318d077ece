//! Offline classifier
//!
//! Deterministic heuristics used when the hosted model cannot answer.

use crate::classifier::Classifier;
use crate::nouns::count_nouns;
use crate::sentiment::SentimentLexicon;
use async_trait::async_trait;
use revlens_core::{AnalysisKind, AnalysisRequest, AnalysisResult, NounLevelResult, Result};

pub struct LocalClassifier {
    name: String,
    lexicon: SentimentLexicon,
}

impl LocalClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("local")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            lexicon: SentimentLexicon::new()?,
        })
    }

    /// Classify without going through the async trait
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        match request.kind {
            AnalysisKind::Sentiment => AnalysisResult::Sentiment(self.lexicon.score(&request.text)),
            AnalysisKind::NounLevel => {
                AnalysisResult::NounLevel(NounLevelResult::from_count(count_nouns(&request.text)))
            }
        }
    }
}

#[async_trait]
impl Classifier for LocalClassifier {
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        Ok(self.analyze(request))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
