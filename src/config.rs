// src/config.rs
// =============================================================================
// Site configuration and the URLs we build from it.
//
// A SiteConfig is created once at startup (from CLI flags / environment
// variables, see cli.rs) and then handed to the DocumentService. Nothing
// here is global or mutable after construction.
//
// Every endpoint is built by appending path segments to a validated base URL:
// - exactly one '/' between segments, however the user wrote the repository,
//   folder, or document path
// - each segment is percent-encoded on its own ("notes#1.md" stays a file
//   name, it does not turn into "notes" plus a fragment)
// - "." and ".." segments are rejected, so no path can leave the repository
// =============================================================================

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.github.com/repos/";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com/";

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// "owner/name", without leading or trailing slashes
    pub repo: String,
    /// Branch served when no revision is requested
    pub branch: String,
    /// Folder (relative to the repository root) used as the index root.
    /// Empty means the repository root.
    pub folder: String,
    /// Bearer token for the REST API, if any
    pub token: Option<String>,
    api_base: Url,
    raw_base: Url,
}

impl SiteConfig {
    pub fn new(
        repo: &str,
        branch: &str,
        folder: &str,
        token: Option<String>,
        api_base: &str,
        raw_base: &str,
    ) -> Result<Self, ConfigError> {
        let repo = repo.trim_matches('/');
        let mut parts = repo.split('/');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid {
            return Err(ConfigError::MissingRepository);
        }

        Ok(Self {
            repo: repo.to_string(),
            branch: branch.trim_matches('/').to_string(),
            folder: folder.trim_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            api_base: parse_base(api_base)?,
            raw_base: parse_base(raw_base)?,
        })
    }

    // History of one document: GET /repos/{repo}/commits?path={doc}
    pub fn commits_url(&self, doc: &str) -> Result<String, ConfigError> {
        // The path goes in the query string, but gets the same checks as
        // every other document path
        let doc = segments(&[doc])?.join("/");

        let mut url = join(&self.api_base, &[&self.repo, "commits"])?;
        url.query_pairs_mut().append_pair("path", &doc);
        Ok(url.into())
    }

    // One commit with its file list: GET /repos/{repo}/commits/{sha}
    pub fn commit_url(&self, sha: &str) -> Result<String, ConfigError> {
        join(&self.api_base, &[&self.repo, "commits", sha]).map(String::from)
    }

    // Directory listing for a repository-relative path
    pub fn contents_url(&self, path: &str) -> Result<String, ConfigError> {
        join(&self.api_base, &[&self.repo, "contents", path]).map(String::from)
    }

    pub fn latest_content_url(&self, doc: &str) -> Result<String, ConfigError> {
        join(
            &self.raw_base,
            &[&self.repo, "refs/heads", &self.branch, doc],
        )
        .map(String::from)
    }

    pub fn revision_content_url(&self, sha: &str, doc: &str) -> Result<String, ConfigError> {
        join(&self.raw_base, &[&self.repo, sha, doc]).map(String::from)
    }
}

// The base keeps its trailing '/' so that an empty path segment marks the
// spot where endpoint segments get appended.
fn parse_base(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    // "mailto:x" and friends have no path to append to
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    Ok(url)
}

// Splits every part on '/' and drops empty pieces, so "hr/", "/hr" and
// "hr" all give the single segment "hr". "." and ".." are refused: they
// would step out of the repository.
fn segments<'a>(parts: &[&'a str]) -> Result<Vec<&'a str>, ConfigError> {
    let mut out = Vec::new();
    for segment in parts.iter().flat_map(|part| part.split('/')) {
        match segment {
            "" => continue,
            "." | ".." => return Err(ConfigError::InvalidPath(parts.join("/"))),
            _ => out.push(segment),
        }
    }
    Ok(out)
}

// Appends each segment percent-encoded, so '#', '?' and ' ' in a file
// name stay part of the path instead of starting a fragment or query
fn join(base: &Url, parts: &[&str]) -> Result<Url, ConfigError> {
    let segments = segments(parts)?;

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just format!("{base}{repo}/{path}")?
//    - A file called "notes#1.md" would end up as "notes" plus a "#1.md"
//      fragment, and "a?b.md" as "a" plus a query string
//    - path_segments_mut().extend() percent-encodes each segment, so those
//      characters become %23 and %3F and stay part of the file name
//
// 2. Why reject ".." instead of encoding it?
//    - "%2E%2E" is still a parent-directory step to most servers, and a
//      document path has no business leaving the repository anyway
//
// 3. What is the lifetime on segments<'a>?
//    - The returned Vec borrows slices of the caller's strings instead of
//      copying them, and 'a tells the compiler they live as long as the input
// -----------------------------------------------------------------------------
