// src/main.rs
// =============================================================================
// Entry point of repogo.
//
// What happens here:
// 1. Set up logging (to stderr, so stdout only ever holds the page)
// 2. Parse command-line arguments and build the site configuration
// 3. Dispatch to the document or index handler
// 4. Print the page (HTML, or JSON with --json)
// 5. Exit with 0 on success, 2 on any error
// =============================================================================

mod cli;
mod config;
mod document;
mod error;
mod github;
mod history;
mod render;
mod route;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use document::DocumentService;
use github::GitHubClient;
use route::{RevisionId, Route};

const INDEX_TITLE: &str = "Repository";

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repogo=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.site.into_config()?;
    let service = DocumentService::new(GitHubClient::new(config.token.clone()), config);

    let output = match cli.command {
        Commands::Doc { path, rev, json } => {
            // A leading slash would never match a file name in a commit
            handle_document(&service, path.trim_start_matches('/'), rev.as_ref(), json).await?
        }
        Commands::Index { title, json } => handle_index(&service, &title, json).await?,
        Commands::Open { request_path, json } => match Route::parse(&request_path)? {
            Route::Index => handle_index(&service, INDEX_TITLE, json).await?,
            Route::Document { path, revision } => {
                handle_document(&service, &path, revision.as_ref(), json).await?
            }
        },
    };

    print!("{output}");
    Ok(())
}

async fn handle_document(
    service: &DocumentService<GitHubClient>,
    path: &str,
    revision: Option<&RevisionId>,
    json: bool,
) -> Result<String> {
    let view = service.render_document(path, revision).await?;

    if json {
        Ok(serde_json::to_string_pretty(&view)? + "\n")
    } else {
        Ok(render::document_page(&view))
    }
}

async fn handle_index(
    service: &DocumentService<GitHubClient>,
    title: &str,
    json: bool,
) -> Result<String> {
    let tree = service.render_index().await?;

    if json {
        Ok(serde_json::to_string_pretty(&tree)? + "\n")
    } else {
        Ok(render::index_page(title, &tree))
    }
}
