// src/route.rs
// =============================================================================
// Maps a request path to the page it asks for.
//
// Routes:
//   /                      -> the repository index
//   /doc/{sha}/{path...}   -> {path} as of commit {sha} (40 lowercase hex)
//   /doc/{path...}         -> the latest version of {path}
//
// The document path is percent-decoded, so the links the index page writes
// (e.g. "/doc/hr/leave%20policy.md") come back as the file's real path.
// Paths with "." or ".." segments are not found.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;

use crate::error::RouteError;

const SHA_LEN: usize = 40;

// A full commit hash, checked to be 40 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let valid = raw.len() == SHA_LEN
            && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(RouteError::InvalidRevision(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets clap parse `--rev <SHA>` straight into a RevisionId
impl FromStr for RevisionId {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Document {
        path: String,
        revision: Option<RevisionId>,
    },
}

impl Route {
    pub fn parse(request_path: &str) -> Result<Self, RouteError> {
        let not_found = || RouteError::NotFound(request_path.to_string());

        // Query strings and fragments play no part in routing
        let path = request_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        if path.is_empty() || path == "/" {
            return Ok(Route::Index);
        }

        let rest = path.strip_prefix("/doc/").ok_or_else(not_found)?;
        let rest = percent_decode_str(rest)
            .decode_utf8()
            .map_err(|_| not_found())?;

        // "/doc/../x" (or "%2E%2E") must not climb out of the repository
        if rest.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(not_found());
        }

        if let Some((first, doc)) = rest.split_once('/') {
            if let Ok(revision) = RevisionId::parse(first) {
                if doc.is_empty() {
                    return Err(not_found());
                }
                return Ok(Route::Document {
                    path: doc.to_string(),
                    revision: Some(revision),
                });
            }
        }

        if rest.is_empty() {
            return Err(not_found());
        }

        Ok(Route::Document {
            path: rest.into_owned(),
            revision: None,
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a newtype?
//    - RevisionId is a String wrapped in its own struct
//    - The only way to build one is parse(), so any RevisionId in the program
//      is known to be a valid hash
//
// 2. What is Cow<str>?
//    - percent_decode_str borrows the input when nothing needed decoding,
//      and allocates only when it did
//    - into_owned() turns either case into a String
// -----------------------------------------------------------------------------
