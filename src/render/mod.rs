// src/render/mod.rs
// =============================================================================
// Turning data into HTML.
//
// Submodules:
// - markdown: document source -> HTML fragment
// - page: full pages around those fragments (document and index)
// =============================================================================

mod markdown;
mod page;

pub use markdown::render_markdown;
pub use page::{document_page, index_page};
