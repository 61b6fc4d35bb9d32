// src/github/models.rs
// =============================================================================
// Typed records for the GitHub payloads we read, and the one generic decoder
// that produces them.
//
// Only the fields we actually use are declared; serde ignores the rest.
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

// One commit, as returned by both `/commits?path=` (list, no files)
// and `/commits/{sha}` (single, with files)
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub commit: CommitDetails,
    /// Absent on the list endpoint
    #[serde(default)]
    pub files: Vec<FileChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    /// RFC 3339, kept as text until the changelog formats it
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
    pub filename: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    /// GitHub leaves this out for binary or very large diffs
    #[serde(default)]
    pub patch: String,
}

// An item of a `/contents/{path}` listing
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

// What the index page shows for each file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
}

impl From<DirectoryEntry> for FileEntry {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
        }
    }
}

/// Decodes a JSON body into any of the record shapes above.
///
/// Either the whole value decodes or nothing does.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
