// src/github/mod.rs
// =============================================================================
// Everything that talks to GitHub.
//
// Submodules:
// - fetch: HTTP GETs against the REST API and the raw-content CDN
// - models: typed GitHub payloads and the generic JSON decoder
// - tree: the two-level folder listing for the index page
// =============================================================================

mod fetch;
mod models;
mod tree;

#[cfg(test)]
pub mod testing;

pub use fetch::{Fetcher, GitHubClient};
pub use models::{decode, CommitRecord};
pub use tree::{fetch_tree, RepositoryTree};

#[cfg(test)]
pub use models::{CommitAuthor, CommitDetails, FileChange, FileEntry};
