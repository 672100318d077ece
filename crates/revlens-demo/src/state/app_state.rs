use crate::config::AppConfig;
use revlens_classifiers::{Analyzer, InferenceConfig};
use revlens_core::{
    Analysis, AnalysisKind, AnalysisRequest, Credential, CredentialStore, Error, Result, Review,
    ReviewSource,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the active token came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token; requests are unauthenticated
    Absent,
    /// Read from the credential file
    Stored(PathBuf),
    /// Given for this run only
    Override,
}

/// Application controller: the loaded reviews, the current selection and
/// the credential, plus the analyzer built from them.
pub struct ReviewApp {
    reviews: ReviewSource,
    current: Option<Review>,
    store: CredentialStore,
    credential: Option<Credential>,
    token_status: TokenStatus,
    inference: InferenceConfig,
    offline: bool,
    analyzer: Analyzer,
}

impl ReviewApp {
    /// Controller with no reviews loaded yet.
    ///
    /// `token_override` takes precedence over the stored token.
    pub fn new(
        store: CredentialStore,
        token_override: Option<&str>,
        inference: InferenceConfig,
        offline: bool,
    ) -> Result<Self> {
        let (credential, token_status) = match token_override.and_then(Credential::new) {
            Some(credential) => (Some(credential), TokenStatus::Override),
            None => match store.load() {
                Ok(Some(credential)) => {
                    (Some(credential), TokenStatus::Stored(store.path().into()))
                }
                Ok(None) => (None, TokenStatus::Absent),
                Err(e) => {
                    warn!(path = %store.path().display(), error = %e, "ignoring unreadable credential file");
                    (None, TokenStatus::Absent)
                }
            },
        };

        let analyzer = Analyzer::from_config(&inference, credential.clone(), offline)?;

        Ok(Self {
            reviews: ReviewSource::from_reviews(Vec::new()),
            current: None,
            store,
            credential,
            token_status,
            inference,
            offline,
            analyzer,
        })
    }

    pub fn from_config(config: &AppConfig, token_override: Option<&str>) -> Result<Self> {
        let store = match &config.credentials_path {
            Some(path) => CredentialStore::open(path),
            None => CredentialStore::open_default()?,
        };
        Self::new(store, token_override, config.inference.clone(), config.offline)
    }

    /// Load reviews from the configured location (samples on failure)
    pub async fn load_reviews(&mut self, config: &AppConfig) -> &ReviewSource {
        self.set_reviews(ReviewSource::load(&config.review_location()).await);
        &self.reviews
    }

    /// Replace the review collection; clears the current selection
    pub fn set_reviews(&mut self, reviews: ReviewSource) {
        self.reviews = reviews;
        self.current = None;
    }

    pub fn reviews(&self) -> &ReviewSource {
        &self.reviews
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn select_random_review(&mut self) -> Result<&Review> {
        let review = self.reviews.pick()?.clone();
        Ok(self.current.insert(review))
    }

    pub fn current_review(&self) -> Option<&Review> {
        self.current.as_ref()
    }

    pub async fn analyze_sentiment(&self) -> Result<Analysis> {
        self.analyze_current(AnalysisKind::Sentiment).await
    }

    pub async fn count_nouns(&self) -> Result<Analysis> {
        self.analyze_current(AnalysisKind::NounLevel).await
    }

    /// Analyze text that did not come from the review collection
    pub async fn analyze_text(&self, text: &str, kind: AnalysisKind) -> Result<Analysis> {
        self.analyzer
            .analyze(&AnalysisRequest::new(text, kind))
            .await
    }

    async fn analyze_current(&self, kind: AnalysisKind) -> Result<Analysis> {
        let review = self.current.as_ref().ok_or(Error::NoReviewSelected)?;
        self.analyze_text(review.text(), kind).await
    }

    /// Store `token` (blank removes it) and use it from now on
    pub fn set_token(&mut self, token: &str) -> Result<TokenStatus> {
        self.credential = self.store.save(token)?;
        self.token_status = match self.credential {
            Some(_) => TokenStatus::Stored(self.store.path().into()),
            None => TokenStatus::Absent,
        };
        self.analyzer =
            Analyzer::from_config(&self.inference, self.credential.clone(), self.offline)?;

        info!(stored = self.credential.is_some(), "token updated");
        Ok(self.token_status.clone())
    }

    pub fn token_status(&self) -> &TokenStatus {
        &self.token_status
    }

    pub fn has_token(&self) -> bool {
        self.credential.is_some()
    }
}
