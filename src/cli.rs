// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Every setting that describes *which* repository we serve can be given as a
// flag or through an environment variable, so the same binary works in a
// shell and in a container:
//
//   REPOGO_REPO=xulinus/policy-docs GITHUB_BEARER_TOKEN=... repogo doc hr/leave.md
//
// The subcommands map one-to-one onto the pages the site serves.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::config::{SiteConfig, DEFAULT_API_URL, DEFAULT_RAW_URL};
use crate::error::ConfigError;
use crate::route::RevisionId;

#[derive(Parser, Debug)]
#[command(
    name = "repogo",
    version,
    about = "Render markdown documents from a GitHub repository as web pages",
    long_about = "repogo fetches a markdown document from a GitHub repository and renders it as a \
                  web page, together with its changelog or the diff of a single revision. \
                  Pages are written to stdout."
)]
pub struct Cli {
    #[command(flatten)]
    pub site: SiteArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// Where the documents live
#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Repository to serve, as owner/name
    #[arg(long, env = "REPOGO_REPO")]
    pub repo: String,

    /// Branch used for the latest version of a document
    #[arg(long, env = "REPOGO_BRANCH", default_value = "main")]
    pub branch: String,

    /// Folder inside the repository used as the root of the index
    #[arg(long, env = "REPOGO_FOLDER")]
    pub folder: Option<String>,

    /// Bearer token for the GitHub REST API
    #[arg(long, env = "GITHUB_BEARER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the REST API's repository endpoints
    #[arg(long, env = "REPOGO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL of the raw-content CDN
    #[arg(long, env = "REPOGO_RAW_URL", default_value = DEFAULT_RAW_URL)]
    pub raw_url: String,
}

impl SiteArgs {
    pub fn into_config(self) -> Result<SiteConfig, ConfigError> {
        SiteConfig::new(
            &self.repo,
            &self.branch,
            self.folder.as_deref().unwrap_or_default(),
            self.token,
            &self.api_url,
            &self.raw_url,
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one document, with its changelog or a revision's diff
    ///
    /// Example: repogo doc hr/leave.md --rev 4f1c2b3a9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f4a
    Doc {
        /// Path of the document inside the repository
        path: String,

        /// Full 40-character commit hash to show the document at
        #[arg(long)]
        rev: Option<RevisionId>,

        /// Print the page data as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Render the repository index (top-level folders and their files)
    Index {
        /// Page title
        #[arg(long, default_value = "Repository")]
        title: String,

        /// Print the folder listing as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Render whatever page a site URL path points at
    ///
    /// Example: repogo open /doc/hr/leave.md
    Open {
        /// Request path, e.g. "/", "/doc/{path}" or "/doc/{sha}/{path}"
        request_path: String,

        /// Print the page data as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
}
