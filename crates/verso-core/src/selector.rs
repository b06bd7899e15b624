//! Canonical record selection: ignore-list filtering and field projection.

use crate::error::TransformError;
use crate::types::{CanonicalRecord, SourceDocument};

/// Project documents onto canonical records, dropping ignored slugs.
///
/// The ignore check runs before any validation, so an ignored document is
/// never inspected further. Input order is preserved.
///
/// # Errors
///
/// Returns [`TransformError::MissingField`] for the first non-ignored document
/// lacking an id, a slug, or an html body.
pub fn select_records(
    documents: &[SourceDocument],
    ignore_slugs: &[String],
) -> Result<Vec<CanonicalRecord>, TransformError> {
    documents
        .iter()
        .filter(|doc| !is_ignored(&doc.slug, ignore_slugs))
        .map(canonicalize)
        .collect()
}

#[must_use]
pub fn is_ignored(slug: &str, ignore_slugs: &[String]) -> bool {
    ignore_slugs.iter().any(|s| s == slug)
}

/// Project one document onto the canonical schema.
///
/// # Errors
///
/// Returns [`TransformError::MissingField`] if `id`, `slug` or `html` is absent.
pub fn canonicalize(doc: &SourceDocument) -> Result<CanonicalRecord, TransformError> {
    let missing = |field| TransformError::MissingField {
        document: document_label(doc),
        field,
    };
    if doc.id.is_empty() {
        return Err(missing("id"));
    }
    if doc.slug.is_empty() {
        return Err(missing("slug"));
    }
    let html = doc.html.clone().ok_or_else(|| missing("html"))?;

    Ok(CanonicalRecord {
        object_id: doc.id.clone(),
        slug: doc.slug.clone(),
        url: doc.url.clone(),
        html,
        image: doc.feature_image.clone(),
        title: doc.title.clone().unwrap_or_default(),
        created_at: doc.created_at.clone(),
        updated_at: doc.updated_at.clone(),
        tags: doc.tags.clone(),
        authors: doc.authors.clone(),
    })
}

fn document_label(doc: &SourceDocument) -> String {
    if !doc.id.is_empty() {
        doc.id.clone()
    } else if !doc.slug.is_empty() {
        doc.slug.clone()
    } else {
        "<unidentified>".into()
    }
}
