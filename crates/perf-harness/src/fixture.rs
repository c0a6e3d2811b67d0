//! Fixture loading for scenario setup hooks
//!
//! Fixtures live under a single root directory chosen at startup. A fixture
//! file holds one JSON document; anything after the first document is
//! ignored, so files with a trailing newline or several concatenated
//! documents load the same way.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::HarnessError;

/// Read-only view of the fixture directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureDir {
    root: PathBuf,
}

/// A decoded fixture and the size of the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct JsonFixture {
    pub value: Value,
    pub byte_len: u64,
}

impl FixtureDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the fixture root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Load the first JSON document of a fixture file.
    pub fn load_json(&self, relative: impl AsRef<Path>) -> Result<JsonFixture, HarnessError> {
        let path = self.path(relative);

        let bytes = fs::read(&path).map_err(|source| HarnessError::FixtureRead {
            path: path.clone(),
            source,
        })?;

        let value = serde_json::Deserializer::from_slice(&bytes)
            .into_iter::<Value>()
            .next()
            .ok_or_else(|| HarnessError::FixtureEmpty { path: path.clone() })?
            .map_err(|source| HarnessError::FixtureMalformed {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "loaded fixture");

        Ok(JsonFixture {
            value,
            byte_len: bytes.len() as u64,
        })
    }
}
