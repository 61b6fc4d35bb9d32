// src/github/tree.rs
// =============================================================================
// Builds the two-level listing for the index page: folder name -> files.
//
// How it works:
// 1. List the configured root folder
// 2. For every entry of type "dir", list that directory once
// 3. Anything below the second level is not looked at
//
// This is deliberately a fixed two-step loop and not recursion. Going deeper
// would need its own design (rate limits, page size), so it is not
// something that should happen by accident.
// =============================================================================

use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::debug;

use super::fetch::Fetcher;
use super::models::{decode, DirectoryEntry, FileEntry};
use crate::config::SiteConfig;
use crate::error::DocError;

// BTreeMap keeps folders in name order for the page
pub type RepositoryTree = BTreeMap<String, Vec<FileEntry>>;

// Fetches the root listing and one listing per top-level directory
//
// The folder keys are the entries' `name`s; the listings use their `path`s
// (a name is only unique within its parent).
//
// Returns an error as soon as any listing fails; a partial tree is
// never returned.
pub async fn fetch_tree<F>(fetcher: &F, config: &SiteConfig) -> Result<RepositoryTree, DocError>
where
    F: Fetcher + ?Sized,
{
    // Level 1: the root
    let root: Vec<DirectoryEntry> = list(fetcher, config, &config.folder).await?;
    let folders: Vec<DirectoryEntry> = root.into_iter().filter(DirectoryEntry::is_dir).collect();

    debug!(folders = folders.len(), "listing top-level folders");

    // Level 2: each folder, once. The listings are independent reads, so
    // they run concurrently.
    let listings = try_join_all(
        folders
            .iter()
            .map(|folder| list(fetcher, config, &folder.path)),
    )
    .await?;

    // try_join_all keeps the input order, so listing i belongs to folder i
    Ok(folders
        .into_iter()
        .zip(listings)
        .map(|(folder, entries)| {
            let files = entries.into_iter().map(FileEntry::from).collect();
            (folder.name, files)
        })
        .collect())
}

async fn list<F>(fetcher: &F, config: &SiteConfig, path: &str) -> Result<Vec<DirectoryEntry>, DocError>
where
    F: Fetcher + ?Sized,
{
    // contents_url percent-encodes the path ("hr #2" -> "hr%20%232")
    let url = config.contents_url(path)?;
    let body = fetcher.fetch(&url, true).await?;
    Ok(decode(&body)?)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `F: Fetcher + ?Sized`?
//    - Sized is implied for every generic parameter; ?Sized lifts that, so
//      fetch_tree also accepts a `&dyn Fetcher`
//
// 2. How does try_join_all work?
//    - It takes many futures and polls them all at once
//    - It finishes with Ok(Vec<_>) once every future succeeded, or with the
//      first Err; the remaining futures are dropped (cancelled)
//
// 3. Why filter(DirectoryEntry::is_dir) without a closure?
//    - A method taking &self can be passed by name wherever a
//      Fn(&DirectoryEntry) -> bool is expected
// -----------------------------------------------------------------------------
