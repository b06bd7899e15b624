//! Loading source documents from JSON files.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use verso_core::SourceDocument;

/// Shapes accepted on the command line.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    /// A saved webhook body.
    Webhook { post: Envelope },
    /// A content API listing.
    Listing { posts: Vec<SourceDocument> },
    Many(Vec<SourceDocument>),
    One(SourceDocument),
}

#[derive(Deserialize)]
struct Envelope {
    current: SourceDocument,
}

/// Parse documents out of `raw`, preserving their order.
///
/// # Errors
///
/// Returns an error if `raw` matches none of the accepted shapes.
pub fn parse_documents(raw: &str) -> anyhow::Result<Vec<SourceDocument>> {
    let file: DocumentFile =
        serde_json::from_str(raw).context("input is not a post, a list of posts or a webhook body")?;
    Ok(match file {
        DocumentFile::Webhook { post } => vec![post.current],
        DocumentFile::Listing { posts } | DocumentFile::Many(posts) => posts,
        DocumentFile::One(doc) => vec![doc],
    })
}

/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_documents(path: &Path) -> anyhow::Result<Vec<SourceDocument>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_documents(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
