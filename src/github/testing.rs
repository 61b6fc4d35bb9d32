// In-memory Fetcher for tests: canned responses keyed by URL, and a record
// of every request made.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::fetch::Fetcher;
use crate::error::FetchError;

#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Result<Vec<u8>, u16>>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.as_bytes().to_vec()));
        self
    }

    pub fn with_json(self, url: &str, value: serde_json::Value) -> Self {
        self.with_body(url, &value.to_string())
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str, authenticated: bool) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push((url.to_string(), authenticated));

        // Unknown URLs behave like GitHub: 404
        match self.responses.get(url).cloned().unwrap_or(Err(404)) {
            Ok(body) => Ok(body),
            Err(status) => Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}
