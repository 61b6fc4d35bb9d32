// src/history/changelog.rs
// =============================================================================
// Turns the commit list for one document into changelog rows.
//
// For each commit:
// - revision: the first 7 characters of the hash
// - date:     the author timestamp as YYYY-MM-DD
// - author:   "Name (email)", cut to fit the changelog column
// - summary:  the first paragraph of the commit message
//
// Rows keep GitHub's order (newest first). If any commit has a bad hash or
// timestamp the whole build fails; a changelog with holes in it would be
// worse than an error page.
// =============================================================================

use chrono::DateTime;
use serde::Serialize;

use crate::error::HistoryError;
use crate::github::CommitRecord;

const SHORT_SHA_LEN: usize = 7;

/// Widest author string the changelog column shows, in characters
pub const AUTHOR_WIDTH: usize = 25;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub revision: String,
    pub full_sha: String,
    pub date: String,
    pub author: String,
    pub summary: String,
}

pub fn build_changelog(commits: &[CommitRecord]) -> Result<Vec<ChangelogEntry>, HistoryError> {
    commits.iter().map(entry_for).collect()
}

fn entry_for(commit: &CommitRecord) -> Result<ChangelogEntry, HistoryError> {
    let author = &commit.commit.author;

    Ok(ChangelogEntry {
        revision: short_sha(&commit.sha)?.to_string(),
        full_sha: commit.sha.clone(),
        date: format_date(&author.date)?,
        author: display_author(&author.name, &author.email),
        summary: summary(&commit.commit.message).to_string(),
    })
}

// First seven characters. Counted in chars, not bytes, so an identifier
// with non-ASCII characters is never cut inside one.
pub fn short_sha(sha: &str) -> Result<&str, HistoryError> {
    // byte offset where each char starts, plus the end of the string
    let mut boundaries = sha.char_indices().map(|(i, _)| i).chain([sha.len()]);

    boundaries
        .nth(SHORT_SHA_LEN)
        .map(|end| &sha[..end])
        .ok_or_else(|| HistoryError::MalformedIdentifier(sha.to_string()))
}

// "2024-03-01T10:00:00Z" -> "2024-03-01", in the timestamp's own offset
fn format_date(timestamp: &str) -> Result<String, HistoryError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .map_err(|_| HistoryError::UnparsableTimestamp(timestamp.to_string()))
}

fn display_author(name: &str, email: &str) -> String {
    let full = format!("{name} ({email})");
    if full.chars().count() <= AUTHOR_WIDTH {
        return full;
    }

    let mut cut: String = full.chars().take(AUTHOR_WIDTH - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

// Everything before the first blank line
fn summary(message: &str) -> &str {
    match message.split_once("\n\n") {
        Some((first, _)) => first,
        None => message,
    }
}
