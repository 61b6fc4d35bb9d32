// src/document.rs
// =============================================================================
// The Document Request Orchestrator.
//
// Given a document path and (maybe) a revision, it decides what to fetch and
// puts together everything a document page needs:
//
// - no revision: the latest file on the configured branch, plus the
//   changelog built from every commit that touched it
// - a revision: the file as of that commit, plus that commit's diff
//   statistics for the file
//
// Order of work for one request:
// 0. build the URLs; a path with "." or ".." segments stops here, before
//    anything is fetched
// 1. history (or commit detail) from the REST API
// 2. the raw document from the CDN
// 3. markdown -> HTML
//
// A failure in step 1 ends the request before step 2 runs. A page that
// renders the document without its history would look correct while
// silently hiding the error.
// =============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::SiteConfig;
use crate::error::DocError;
use crate::github::{decode, fetch_tree, CommitRecord, Fetcher, RepositoryTree};
use crate::history::{build_changelog, extract_revision_diff, ChangelogEntry, RevisionDiff};
use crate::render::render_markdown;
use crate::route::RevisionId;

// Everything the document page template needs
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub filename: String,
    pub html: String,
    /// Empty when a specific revision was requested
    pub changelog: Vec<ChangelogEntry>,
    /// Only set when a specific revision was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<RevisionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevisionView {
    pub sha: String,
    pub message: String,
    pub diff: RevisionDiff,
}

pub struct DocumentService<F> {
    fetcher: F,
    config: SiteConfig,
}

impl<F: Fetcher> DocumentService<F> {
    pub fn new(fetcher: F, config: SiteConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn render_document(
        &self,
        path: &str,
        revision: Option<&RevisionId>,
    ) -> Result<DocumentView, DocError> {
        info!(path, revision = revision.map(RevisionId::as_str), "rendering document");

        let (content_url, changelog, revision) = match revision {
            None => {
                let content_url = self.config.latest_content_url(path)?;
                let commits: Vec<CommitRecord> =
                    self.fetch_json(&self.config.commits_url(path)?).await?;

                (content_url, build_changelog(&commits)?, None)
            }
            Some(sha) => {
                let content_url = self.config.revision_content_url(sha.as_str(), path)?;
                let commit: CommitRecord =
                    self.fetch_json(&self.config.commit_url(sha.as_str())?).await?;
                // a commit that did not touch `path` is fine, see RevisionDiff::matched
                let diff = extract_revision_diff(&commit, path);

                (
                    content_url,
                    Vec::new(),
                    Some(RevisionView {
                        sha: commit.sha,
                        message: commit.commit.message,
                        diff,
                    }),
                )
            }
        };

        // The CDN serves public repositories without credentials
        let markdown = self.fetcher.fetch(&content_url, false).await?;

        Ok(DocumentView {
            filename: path.to_string(),
            html: render_markdown(&markdown),
            changelog,
            revision,
        })
    }

    pub async fn render_index(&self) -> Result<RepositoryTree, DocError> {
        info!(repo = %self.config.repo, folder = %self.config.folder, "rendering index");
        fetch_tree(&self.fetcher, &self.config).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DocError> {
        let body = self.fetcher.fetch(url, true).await?;
        Ok(decode(&body)?)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is DocumentService generic over F: Fetcher?
//    - main.rs builds it with the real GitHubClient
//    - the tests below build it with FakeFetcher and then look at which URLs
//      were requested, in which order
//    - generics are resolved at compile time, so this costs nothing at runtime
//
// 2. How do errors from different stages end up in one DocError?
//    - every stage has its own error type (FetchError, DecodeError, ...)
//    - DocError has a #[from] variant for each, so `?` converts automatically
//
// 3. Why does fetch_json take a type parameter?
//    - the same helper decodes a Vec<CommitRecord> (history) and a single
//      CommitRecord (one revision); the caller picks with a type annotation
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_API_URL, DEFAULT_RAW_URL};
    use crate::error::{ConfigError, FetchError, HistoryError};
    use crate::github::testing::FakeFetcher;
    use serde_json::json;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";
    const HISTORY: &str = "https://api.github.com/repos/acme/docs/commits?path=doc.md";
    const LATEST: &str = "https://raw.githubusercontent.com/acme/docs/refs/heads/main/doc.md";

    fn detail_url() -> String {
        format!("https://api.github.com/repos/acme/docs/commits/{SHA}")
    }

    fn revision_content_url() -> String {
        format!("https://raw.githubusercontent.com/acme/docs/{SHA}/doc.md")
    }

    fn service(fetcher: FakeFetcher) -> DocumentService<FakeFetcher> {
        let config =
            SiteConfig::new("acme/docs", "main", "", None, DEFAULT_API_URL, DEFAULT_RAW_URL).unwrap();
        DocumentService::new(fetcher, config)
    }

    fn commit(sha: &str, date: &str, message: &str) -> serde_json::Value {
        json!({
            "sha": sha,
            "commit": {
                "author": {"name": "Ada", "email": "ada@x.io", "date": date},
                "message": message
            }
        })
    }

    fn revision() -> RevisionId {
        RevisionId::parse(SHA).unwrap()
    }

    #[tokio::test]
    async fn test_latest_document_with_changelog() {
        let fetcher = FakeFetcher::new()
            .with_json(
                HISTORY,
                json!([
                    commit("c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f6", "2024-05-03T09:15:00Z", "Third\n\nBody"),
                    commit("b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5", "2024-04-02T12:00:00Z", "Second"),
                    commit("a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4", "2024-01-09T08:00:00Z", "First"),
                ]),
            )
            .with_body(LATEST, "## Hello World\n");
        let service = service(fetcher);

        let view = service.render_document("doc.md", None).await.unwrap();

        assert_eq!(view.filename, "doc.md");
        assert!(view.html.contains("id=\"hello-world\""));
        assert!(view.revision.is_none());
        assert_eq!(view.changelog.len(), 3);
        assert_eq!(view.changelog[0].revision, "c3d4e5f");
        assert_eq!(view.changelog[0].summary, "Third");
        assert_eq!(view.changelog[2].date, "2024-01-09");

        // history first (authenticated), then content (not)
        assert_eq!(
            service.fetcher.calls(),
            vec![(HISTORY.to_string(), true), (LATEST.to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_document_at_revision() {
        let fetcher = FakeFetcher::new()
            .with_json(
                &detail_url(),
                json!({
                    "sha": SHA,
                    "commit": {
                        "author": {"name": "Ada", "email": "ada@x.io", "date": "2024-03-01T10:00:00Z"},
                        "message": "Tighten wording"
                    },
                    "files": [
                        {"filename": "other.md", "additions": 1, "deletions": 1, "changes": 2, "patch": "x"},
                        {"filename": "doc.md", "additions": 5, "deletions": 2, "changes": 7, "patch": "@@ -1,3 +1,6 @@"}
                    ]
                }),
            )
            .with_body(&revision_content_url(), "# Old text\n");
        let service = service(fetcher);

        let view = service.render_document("doc.md", Some(&revision())).await.unwrap();

        assert!(view.changelog.is_empty());
        let revision = view.revision.unwrap();
        assert_eq!(revision.sha, SHA);
        assert_eq!(revision.message, "Tighten wording");
        assert!(revision.diff.matched);
        assert_eq!(revision.diff.additions, 5);
        assert_eq!(revision.diff.deletions, 2);
        assert_eq!(revision.diff.changes, 7);
        assert!(!revision.diff.patch.is_empty());
        assert_eq!(
            service.fetcher.calls(),
            vec![(detail_url(), true), (revision_content_url(), false)]
        );
    }

    #[tokio::test]
    async fn test_revision_that_did_not_touch_document() {
        let fetcher = FakeFetcher::new()
            .with_json(&detail_url(), commit(SHA, "2024-03-01T10:00:00Z", "Other work"))
            .with_body(&revision_content_url(), "text");

        let view = service(fetcher)
            .render_document("doc.md", Some(&revision()))
            .await
            .unwrap();

        let diff = view.revision.unwrap().diff;
        assert!(!diff.matched);
        assert_eq!(diff, RevisionDiff::default());
    }

    #[tokio::test]
    async fn test_revision_that_renamed_document_is_a_match() {
        let fetcher = FakeFetcher::new()
            .with_json(
                &detail_url(),
                json!({
                    "sha": SHA,
                    "commit": {
                        "author": {"name": "Ada", "email": "ada@x.io", "date": "2024-03-01T10:00:00Z"},
                        "message": "Rename"
                    },
                    "files": [
                        {"filename": "doc.md", "additions": 0, "deletions": 0, "changes": 0}
                    ]
                }),
            )
            .with_body(&revision_content_url(), "text");

        let view = service(fetcher)
            .render_document("doc.md", Some(&revision()))
            .await
            .unwrap();

        let diff = view.revision.unwrap().diff;
        assert!(diff.matched);
        assert_eq!(diff.changes, 0);
    }

    #[tokio::test]
    async fn test_path_leaving_the_repository_fetches_nothing() {
        let service = service(FakeFetcher::new());

        for path in ["../../../../evil/repo/main/x.md", "hr/../../x.md"] {
            let latest = service.render_document(path, None).await;
            assert!(
                matches!(latest, Err(DocError::Config(ConfigError::InvalidPath(_)))),
                "{path}"
            );

            let at_revision = service.render_document(path, Some(&revision())).await;
            assert!(
                matches!(at_revision, Err(DocError::Config(ConfigError::InvalidPath(_)))),
                "{path}"
            );
        }

        assert!(service.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_hash_in_file_name_is_fetched_as_a_name() {
        let fetcher = FakeFetcher::new()
            .with_json(
                "https://api.github.com/repos/acme/docs/commits?path=notes%231.md",
                json!([]),
            )
            .with_body(
                "https://raw.githubusercontent.com/acme/docs/refs/heads/main/notes%231.md",
                "# Notes\n",
            );

        let view = service(fetcher).render_document("notes#1.md", None).await.unwrap();

        assert_eq!(view.filename, "notes#1.md");
        assert!(view.html.contains("id=\"notes\""));
    }

    #[tokio::test]
    async fn test_history_404_fails_before_content_fetch() {
        let fetcher = FakeFetcher::new()
            .with_status(HISTORY, 404)
            .with_body(LATEST, "# Doc");
        let service = service(fetcher);

        let result = service.render_document("doc.md", None).await;

        assert!(matches!(
            result,
            Err(DocError::Fetch(FetchError::UnexpectedStatus { status: 404, .. }))
        ));
        assert_eq!(service.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_history_is_an_error() {
        let fetcher = FakeFetcher::new()
            .with_body(HISTORY, "<html>rate limited</html>")
            .with_body(LATEST, "# Doc");

        let result = service(fetcher).render_document("doc.md", None).await;

        assert!(matches!(result, Err(DocError::Decode(_))));
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_an_error() {
        let fetcher = FakeFetcher::new()
            .with_json(HISTORY, json!([commit(SHA, "yesterday", "x")]))
            .with_body(LATEST, "# Doc");

        let result = service(fetcher).render_document("doc.md", None).await;

        assert!(matches!(
            result,
            Err(DocError::History(HistoryError::UnparsableTimestamp(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let fetcher = FakeFetcher::new().with_json(HISTORY, json!([]));

        let result = service(fetcher).render_document("doc.md", None).await;

        assert!(matches!(result, Err(DocError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_render_index() {
        let fetcher = FakeFetcher::new()
            .with_json(
                "https://api.github.com/repos/acme/docs/contents",
                json!([{"name": "hr", "path": "hr", "type": "dir"}]),
            )
            .with_json(
                "https://api.github.com/repos/acme/docs/contents/hr",
                json!([{"name": "leave.md", "path": "hr/leave.md", "type": "file"}]),
            );

        let tree = service(fetcher).render_index().await.unwrap();

        assert_eq!(tree.keys().collect::<Vec<_>>(), ["hr"]);
    }

    #[test]
    fn test_view_json_omits_absent_revision() {
        let view = DocumentView {
            filename: "doc.md".to_string(),
            html: String::new(),
            changelog: Vec::new(),
            revision: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("revision").is_none());
        assert_eq!(json["filename"], "doc.md");
    }
}
