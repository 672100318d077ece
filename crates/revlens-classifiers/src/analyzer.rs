//! Analyzer: primary classifier with a local fallback
//!
//! Failure policy:
//! - rate-limit and authorization errors reach the caller unchanged
//! - an unrecognized payload yields the neutral/low default
//! - every other failure is answered by the local heuristic

use crate::classifier::Classifier;
use crate::config::InferenceConfig;
use crate::local::LocalClassifier;
use crate::remote::RemoteClassifier;
use revlens_core::{Analysis, AnalysisRequest, AnalysisResult, Credential, Error, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Analyzer {
    primary: Option<Arc<dyn Classifier>>,
    fallback: LocalClassifier,
}

impl Analyzer {
    /// Analyzer that tries `primary` first
    pub fn new(primary: Arc<dyn Classifier>) -> Result<Self> {
        Ok(Self {
            primary: Some(primary),
            fallback: LocalClassifier::new()?,
        })
    }

    /// Analyzer that only runs the local heuristic
    pub fn offline() -> Result<Self> {
        Ok(Self {
            primary: None,
            fallback: LocalClassifier::new()?,
        })
    }

    /// Remote analyzer for `config`, or an offline one when `offline` is set
    pub fn from_config(
        config: &InferenceConfig,
        credential: Option<Credential>,
        offline: bool,
    ) -> Result<Self> {
        if offline {
            info!("offline mode, using local heuristics only");
            return Self::offline();
        }
        let remote = RemoteClassifier::new(config)?.with_credential(credential);
        Self::new(Arc::new(remote))
    }

    pub fn is_offline(&self) -> bool {
        self.primary.is_none()
    }

    /// Name of the classifier asked first
    pub fn primary_name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.fallback.name(),
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis> {
        let Some(primary) = &self.primary else {
            return Ok(Analysis::local(self.fallback.analyze(request)));
        };

        match primary.classify(request).await {
            Ok(result) => Ok(Analysis::remote(result)),
            Err(e) if e.is_surfaced() => Err(e),
            Err(Error::MalformedResponse(details)) => {
                warn!(
                    classifier = primary.name(),
                    kind = %request.kind,
                    details = %details,
                    "unrecognized response, using default"
                );
                Ok(Analysis::remote(AnalysisResult::default_for(request.kind)))
            }
            Err(e) => {
                warn!(
                    classifier = primary.name(),
                    kind = %request.kind,
                    error = %e,
                    "remote analysis failed, using local fallback"
                );
                Ok(Analysis::local(self.fallback.analyze(request)))
            }
        }
    }
}
