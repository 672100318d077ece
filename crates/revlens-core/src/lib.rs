//! revlens Core
//!
//! Core types, traits, and utilities shared across revlens components.
//!
//! This crate provides:
//! - Review, request, and normalized result types
//! - Error types and result handling
//! - The review source (TSV loading with a sample fallback)
//! - The file-backed credential store

pub mod credential;
pub mod error;
pub mod reviews;
pub mod types;

pub use credential::{Credential, CredentialStore, TOKEN_KEY};
pub use error::{Error, Result};
pub use reviews::{parse_tsv, ReviewLocation, ReviewOrigin, ReviewSource, SAMPLE_REVIEWS};
pub use types::{
    Analysis, AnalysisKind, AnalysisRequest, AnalysisResult, NounLevel, NounLevelResult, Origin,
    Review, Sentiment, SentimentResult, DEFAULT_CONFIDENCE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        Analysis, AnalysisKind, AnalysisRequest, AnalysisResult, NounLevel, NounLevelResult,
        Origin, Review, Sentiment, SentimentResult,
    };
}
