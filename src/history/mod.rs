// src/history/mod.rs
// =============================================================================
// Commit history, shaped for display.
//
// Submodules:
// - changelog: the list of revisions shown under the latest document
// - revision: diff statistics for one document at one revision
// =============================================================================

mod changelog;
mod revision;

pub use changelog::{build_changelog, ChangelogEntry};
pub use revision::{extract_revision_diff, RevisionDiff};
