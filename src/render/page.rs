// src/render/page.rs
// =============================================================================
// Complete HTML pages for the two things we serve:
//
// - a document page: the rendered document, followed by either its
//   changelog (latest version) or the diff block (one revision)
// - the index page: every top-level folder with links to its files
//
// Everything that comes from GitHub (file names, commit messages, patches)
// is HTML-escaped here, and document links are percent-encoded one path
// segment at a time. Only the document body, which the markdown renderer
// already produced, is inserted as-is.
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use pulldown_cmark::escape::escape_html;

use crate::document::{DocumentView, RevisionView};
use crate::github::RepositoryTree;
use crate::history::ChangelogEntry;

const STYLESHEET: &str = "/css/style.css";

// Characters that cannot appear raw inside one path segment. '#' and '?'
// would end the path, '%' would start an escape, '/' would split the segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub fn document_page(view: &DocumentView) -> String {
    let mut body = format!(
        "<article class=\"document\">\n{}</article>\n",
        view.html
    );

    match &view.revision {
        Some(revision) => body.push_str(&revision_section(&view.filename, revision)),
        None => body.push_str(&changelog_section(&view.filename, &view.changelog)),
    }

    layout(&view.filename, &breadcrumb(&view.filename), &body)
}

pub fn index_page(title: &str, tree: &RepositoryTree) -> String {
    let mut body = String::new();

    if tree.is_empty() {
        body.push_str("<p class=\"empty\">No folders found.</p>\n");
    }

    for (folder, files) in tree {
        body.push_str(&format!("<section class=\"folder\">\n<h2>{}</h2>\n<ul>\n", text(folder)));
        for file in files {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                doc_href(None, &file.path),
                text(&file.name)
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    layout(title, &format!("<h1>{}</h1>", text(title)), &body)
}

fn changelog_section(path: &str, changelog: &[ChangelogEntry]) -> String {
    let mut out = String::from("<section class=\"changelog\">\n<h2>Changelog</h2>\n");

    if changelog.is_empty() {
        out.push_str("<p class=\"empty\">No history for this document.</p>\n</section>\n");
        return out;
    }

    out.push_str(
        "<table>\n<thead><tr><th>Date</th><th>Revision</th><th>Author</th><th>Change</th></tr></thead>\n<tbody>\n",
    );
    for entry in changelog {
        out.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"{}\"><code>{}</code></a></td><td>{}</td><td>{}</td></tr>\n",
            text(&entry.date),
            doc_href(Some(&entry.full_sha), path),
            text(&entry.revision),
            text(&entry.author),
            text(&entry.summary),
        ));
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
    out
}

fn revision_section(path: &str, revision: &RevisionView) -> String {
    let mut out = format!(
        "<section class=\"revision\">\n<h2>Revision <code>{}</code></h2>\n\
         <p><a href=\"{}\">Latest version</a></p>\n\
         <pre class=\"message\">{}</pre>\n",
        text(&revision.sha),
        doc_href(None, path),
        text(&revision.message),
    );

    let diff = &revision.diff;
    if !diff.matched {
        out.push_str("<p class=\"empty\">No changes to this document in this revision.</p>\n");
        out.push_str("</section>\n");
        return out;
    }

    out.push_str(&format!(
        "<p class=\"stats\"><span class=\"additions\">+{}</span> \
         <span class=\"deletions\">-{}</span> \
         <span class=\"changes\">{} changes</span></p>\n",
        diff.additions, diff.deletions, diff.changes,
    ));

    // renames, mode changes and binary files come without a patch
    if diff.patch.is_empty() {
        out.push_str("<p class=\"no-patch\">No line changes to show.</p>\n");
    } else {
        out.push_str(&format!("<pre class=\"patch\">{}</pre>\n", text(&diff.patch)));
    }

    out.push_str("</section>\n");
    out
}

fn breadcrumb(path: &str) -> String {
    format!("<nav><a href=\"/\">Repository</a> / {}</nav>", text(path))
}

fn layout(title: &str, header: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"{STYLESHEET}\">\n</head>\n\
         <body>\n<header>{header}</header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        text(title),
    )
}

// Writing into a String cannot fail
fn text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let _ = escape_html(&mut out, raw);
    out
}

// "/doc/[sha/]path" with every path segment percent-encoded, so the router
// decodes it back to exactly `path`
fn doc_href(sha: Option<&str>, path: &str) -> String {
    let mut out = String::from("/doc");
    for segment in sha.into_iter().chain(path.split('/')) {
        out.push('/');
        out.extend(utf8_percent_encode(segment, SEGMENT));
    }
    text(&out)
}
