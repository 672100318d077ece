//! Application configuration

use crate::cli::Cli;
use revlens_classifiers::InferenceConfig;
use revlens_core::ReviewLocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Review file path or http(s) URL
    #[serde(default = "default_reviews")]
    pub reviews: String,

    /// Skip the hosted API entirely
    #[serde(default)]
    pub offline: bool,

    /// Credential file; the platform config directory when unset
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    #[serde(default)]
    pub inference: InferenceConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Self::from_file(config_path)?;

        if let Some(reviews) = &cli.reviews {
            config.reviews = reviews.clone();
        }

        if let Some(endpoint) = &cli.endpoint {
            config.inference.base_url = endpoint.clone();
        }

        if cli.offline {
            config.offline = true;
        }

        Ok(config)
    }

    /// Read `config_path`, or use defaults when it does not exist
    pub fn from_file(config_path: &str) -> anyhow::Result<Self> {
        if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn review_location(&self) -> ReviewLocation {
        match self.reviews.parse() {
            Ok(location) => location,
            Err(never) => match never {},
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reviews: default_reviews(),
            offline: false,
            credentials_path: None,
            inference: InferenceConfig::default(),
        }
    }
}

fn default_reviews() -> String {
    "reviews_test.tsv".to_string()
}
