//! Review collection: TSV loading with a built-in sample fallback

use crate::error::{Error, Result};
use crate::types::Review;
use rand::seq::SliceRandom;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Name of the column holding review text
pub const TEXT_COLUMN: &str = "text";

/// Reviews served when the configured resource cannot be loaded
pub const SAMPLE_REVIEWS: &[&str] = &[
    "This product is absolutely amazing! It exceeded all my expectations and works perfectly.",
    "I'm very disappointed with this purchase. The quality is poor and it broke after just one use.",
    "The item is okay for the price, but nothing special. It does what it's supposed to do.",
    "Outstanding quality and fantastic customer service. I would definitely recommend this to others!",
    "Terrible experience. The product arrived damaged and the company refused to provide a refund.",
    "It's a decent product that gets the job done. Not the best, but certainly not the worst either.",
    "I love this product! It has completely changed how I approach my daily tasks. Highly recommended!",
    "Poor quality materials and bad craftsmanship. I regret spending money on this item.",
    "The product works as described. It's a good value for the money I paid.",
    "Exceptional quality and attention to detail. This is exactly what I was looking for!",
];

/// Where reviews are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewLocation {
    Path(PathBuf),
    Url(String),
}

impl FromStr for ReviewLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for ReviewLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Which resource the loaded reviews came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOrigin {
    File(PathBuf),
    Url(String),
    Samples,
    /// Handed over by the caller
    Memory,
}

impl From<&ReviewLocation> for ReviewOrigin {
    fn from(location: &ReviewLocation) -> Self {
        match location {
            ReviewLocation::Path(path) => Self::File(path.clone()),
            ReviewLocation::Url(url) => Self::Url(url.clone()),
        }
    }
}

/// Ordered collection of reviews with uniform random selection
#[derive(Debug, Clone)]
pub struct ReviewSource {
    reviews: Vec<Review>,
    origin: ReviewOrigin,
}

impl ReviewSource {
    /// Load reviews from `location`, falling back to [`SAMPLE_REVIEWS`] on
    /// any failure so callers always get something to show.
    pub async fn load(location: &ReviewLocation) -> Self {
        match Self::try_load(location).await {
            Ok(reviews) => {
                info!(count = reviews.len(), location = %location, "loaded reviews");
                Self {
                    reviews,
                    origin: location.into(),
                }
            }
            Err(e) => {
                warn!(error = %e, location = %location, "using sample reviews");
                Self::samples()
            }
        }
    }

    /// Load reviews from `location` without falling back.
    ///
    /// Fails when the resource cannot be read, has no `text` column, holds a
    /// malformed row, or yields no non-blank reviews.
    pub async fn try_load(location: &ReviewLocation) -> Result<Vec<Review>> {
        let body = match location {
            ReviewLocation::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                Error::review_source(format!("reading {}: {e}", path.display()))
            })?,
            ReviewLocation::Url(url) => fetch(url).await?,
        };

        let reviews = parse_tsv(body.as_slice())?;
        if reviews.is_empty() {
            return Err(Error::review_source(format!(
                "{location} contains no reviews"
            )));
        }
        Ok(reviews)
    }

    /// The built-in sample set
    pub fn samples() -> Self {
        Self {
            reviews: SAMPLE_REVIEWS.iter().map(|&text| Review::new(text)).collect(),
            origin: ReviewOrigin::Samples,
        }
    }

    /// Wrap an already-loaded collection
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            origin: ReviewOrigin::Memory,
        }
    }

    /// Pick one review uniformly at random
    pub fn pick(&self) -> Result<&Review> {
        self.reviews
            .choose(&mut rand::thread_rng())
            .ok_or(Error::EmptyCollection)
    }

    pub fn origin(&self) -> &ReviewOrigin {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter()
    }
}

/// Parse tab-separated text with a header row, keeping every non-blank
/// value of the `text` column.
///
/// Quoting is disabled: review text routinely contains bare `"` characters.
pub fn parse_tsv<R: Read>(reader: R) -> Result<Vec<Review>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::review_source(format!("reading header row: {e}")))?
        .clone();
    let column = headers
        .iter()
        .position(|h| h.trim() == TEXT_COLUMN)
        .ok_or_else(|| Error::review_source(format!("missing '{TEXT_COLUMN}' column")))?;

    let mut reviews = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record =
            record.map_err(|e| Error::review_source(format!("row {}: {e}", row + 1)))?;
        match record.get(column).map(str::trim) {
            Some(text) if !text.is_empty() => reviews.push(Review::new(text)),
            _ => debug!(row = row + 1, "skipping row without review text"),
        }
    }

    Ok(reviews)
}

async fn fetch(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::get(url)
        .await
        .map_err(|e| Error::review_source(format!("fetching {url}: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::review_source(format!("fetching {url}: HTTP {status}")));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| Error::review_source(format!("reading {url}: {e}")))?;
    Ok(bytes.to_vec())
}
