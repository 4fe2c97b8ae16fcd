use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::keyid::short_key_id;

/// A set of short key IDs loaded from a list file.
///
/// List files carry one key ID per line, short or long form. IDs are
/// normalized to the 8-character short form on load; lines that fail
/// normalization are dropped with a diagnostic. The resulting set is
/// de-duplicated and sorted once at construction, which is what makes the
/// binary search in [`contains`](KeyIdList::contains) sound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIdList {
    ids: Vec<String>,
}

impl KeyIdList {
    /// Parses list-file content. Never fails; bad lines are skipped.
    pub fn parse(input: &str) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for (lineno, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match short_key_id(line) {
                Some(short) => ids.push(short.to_uppercase()),
                None => warn!(line = lineno + 1, id = line, "key ID in wrong format, skipping"),
            }
        }
        ids.sort();
        ids.dedup();
        Self { ids }
    }

    /// Loads and parses a list file. An unreadable file is fatal, unlike
    /// individual malformed lines.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::ListFile {
                path: PathBuf::from(path),
                source,
            })?;
        Ok(Self::parse(&input))
    }

    /// Membership test for a normalized short ID. Binary search; relies on
    /// the sort performed at construction.
    pub fn contains(&self, short_id: &str) -> bool {
        self.ids.binary_search_by(|id| id.as_str().cmp(short_id)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
