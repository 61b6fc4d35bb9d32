// src/github/fetch.rs
// =============================================================================
// The Remote API Client: GET requests against the GitHub REST API and the
// raw.githubusercontent.com CDN.
//
// Strategy:
// - API calls are "authenticated": they carry the bearer token (if one is
//   configured) and JSON headers
// - Raw document downloads go to the CDN without credentials
// - Any non-2xx status is an error, and the body is thrown away
// - No retries and no custom timeout; reqwest's defaults apply
//
// The Fetcher trait is the seam between the rest of the program and the
// network. GitHubClient is the real implementation; tests plug in a fake.
//
// Rust concepts:
// - Traits with async methods (via async-trait)
// - Result: every failure is returned, never printed and ignored
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::FetchError;

// GitHub rejects API requests that have no User-Agent
const AGENT: &str = concat!("repogo/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the response body.
    ///
    /// When `authenticated` is true the request carries the bearer token
    /// and JSON content headers.
    async fn fetch(&self, url: &str, authenticated: bool) -> Result<Vec<u8>, FetchError>;
}

// Talks to GitHub over HTTPS
//
// The reqwest Client is cheap to clone and pools connections, so one
// GitHubClient is created at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            token,
        }
    }
}

#[async_trait]
impl Fetcher for GitHubClient {
    async fn fetch(&self, url: &str, authenticated: bool) -> Result<Vec<u8>, FetchError> {
        debug!(url, authenticated, "fetching");

        let mut request = self.http.get(url).header(USER_AGENT, AGENT);
        if authenticated {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, GITHUB_JSON);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "unexpected status");
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - DocumentService is generic over any Fetcher
//    - Tests hand it an in-memory fake (github/testing.rs), so the whole
//      request flow runs without a network
//
// 2. What does #[async_trait] do?
//    - Rewrites `async fn` in the trait into methods returning boxed futures,
//      so the trait can be used with generics and `dyn`
//
// 3. Why map_err everywhere?
//    - reqwest::Error alone does not say which URL failed
//    - Wrapping it in FetchError::Transport { url, source } keeps both
// -----------------------------------------------------------------------------
