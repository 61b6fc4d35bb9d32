// src/history/revision.rs
// =============================================================================
// Picks one file's diff statistics out of a commit.
//
// The match on the path is exact: case-sensitive, no slash cleanup. A commit
// that did not touch the document gives back an all-zero RevisionDiff. That
// is not an error; it just means there is nothing to show.
//
// `matched` tells the two cases apart. A rename or a mode change touches the
// file with zero line counts and no patch, and that still is a change.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::github::CommitRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevisionDiff {
    /// True when the commit's file list contains the document
    pub matched: bool,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    pub patch: String,
}

pub fn extract_revision_diff(commit: &CommitRecord, path: &str) -> RevisionDiff {
    match commit.files.iter().find(|file| file.filename == path) {
        Some(file) => RevisionDiff {
            matched: true,
            additions: file.additions,
            deletions: file.deletions,
            changes: file.changes,
            patch: file.patch.clone(),
        },
        None => {
            debug!(sha = %commit.sha, path, "no matching file in revision");
            RevisionDiff::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{CommitAuthor, CommitDetails, FileChange};

    fn file(name: &str, additions: u64, deletions: u64, patch: &str) -> FileChange {
        FileChange {
            filename: name.to_string(),
            additions,
            deletions,
            changes: additions + deletions,
            patch: patch.to_string(),
        }
    }

    fn commit(files: Vec<FileChange>) -> CommitRecord {
        CommitRecord {
            sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
            commit: CommitDetails {
                author: CommitAuthor {
                    name: "Ada".to_string(),
                    email: "a@x.io".to_string(),
                    date: "2024-03-01T10:00:00Z".to_string(),
                },
                message: "Edit".to_string(),
            },
            files,
        }
    }

    #[test]
    fn test_matching_file() {
        let commit = commit(vec![
            file("README.md", 1, 0, "@@ -0,0 +1 @@"),
            file("doc.md", 5, 2, "@@ -1,4 +1,7 @@\n-old\n+new"),
        ]);

        let diff = extract_revision_diff(&commit, "doc.md");

        assert_eq!(diff.additions, 5);
        assert_eq!(diff.deletions, 2);
        assert_eq!(diff.changes, 7);
        assert!(!diff.patch.is_empty());
        assert!(diff.matched);
    }

    #[test]
    fn test_first_match_wins() {
        let commit = commit(vec![file("doc.md", 1, 1, "first"), file("doc.md", 9, 9, "second")]);
        assert_eq!(extract_revision_diff(&commit, "doc.md").patch, "first");
    }

    #[test]
    fn test_no_match_is_zero_valued() {
        let commit = commit(vec![file("other.md", 3, 3, "x")]);
        let diff = extract_revision_diff(&commit, "doc.md");
        assert_eq!(diff, RevisionDiff::default());
        assert!(!diff.matched);
    }

    #[test]
    fn test_match_is_exact() {
        let commit = commit(vec![
            file("Doc.md", 1, 0, "x"),
            file("/doc.md", 1, 0, "x"),
            file("hr/doc.md", 1, 0, "x"),
        ]);
        assert!(!extract_revision_diff(&commit, "doc.md").matched);
    }

    #[test]
    fn test_commit_without_files() {
        assert!(!extract_revision_diff(&commit(Vec::new()), "doc.md").matched);
    }

    #[test]
    fn test_rename_without_line_changes_still_matches() {
        let commit = commit(vec![file("doc.md", 0, 0, "")]);

        let diff = extract_revision_diff(&commit, "doc.md");

        assert!(diff.matched);
        assert_eq!((diff.additions, diff.deletions, diff.changes), (0, 0, 0));
        assert_ne!(diff, RevisionDiff::default());
    }
}
