//! Bearer token persistence
//!
//! The token lives in a small JSON object file under a fixed key, so the
//! file can be shared with other settings without clobbering them.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key under which the token is stored
pub const TOKEN_KEY: &str = "hfApiToken";

/// Opaque bearer token for the inference API
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, returning `None` for blank input
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// The raw token, for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// File-backed store for a single [`Credential`]
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by `path`; the file need not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory (`<config>/revlens/credentials.json`)
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::credential("no config directory on this platform"))?;
        Ok(Self::open(dir.join("revlens").join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token; a missing file or key means no token
    pub fn load(&self) -> Result<Option<Credential>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .and_then(Credential::new))
    }

    /// Persist `token`, or remove the entry when it is blank.
    ///
    /// A file that does not parse as a JSON object is replaced.
    pub fn save(&self, token: &str) -> Result<Option<Credential>> {
        let credential = Credential::new(token);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e @ (Error::Serialization(_) | Error::Credential(_))) => {
                warn!(path = %self.path.display(), error = %e, "overwriting unreadable credential file");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        match &credential {
            Some(c) => {
                entries.insert(TOKEN_KEY.to_string(), Value::String(c.expose().to_string()));
            }
            None => {
                entries.remove(TOKEN_KEY);
            }
        }
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), stored = credential.is_some(), "credential saved");
        Ok(credential)
    }

    /// Remove the stored token
    pub fn clear(&self) -> Result<()> {
        self.save("").map(|_| ())
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::credential(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
