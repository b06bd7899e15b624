use serde::Serialize;

use crate::error::TransformError;
use crate::types::IndexFragment;

/// A record left out of the output under [`super::FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub object_id: String,
    pub slug: String,
    pub reason: String,
}

/// Ordered output of a batch: fragments of every successful record plus the
/// records that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Accumulation {
    pub fragments: Vec<IndexFragment>,
    pub skipped: Vec<SkippedRecord>,
}

impl Accumulation {
    /// Append one record's fragments, keeping their order.
    #[must_use]
    pub fn append(mut self, fragments: Vec<IndexFragment>) -> Self {
        self.fragments.extend(fragments);
        self
    }

    #[must_use]
    pub fn skip(mut self, object_id: &str, slug: &str, error: &TransformError) -> Self {
        self.skipped.push(SkippedRecord {
            object_id: object_id.to_owned(),
            slug: slug.to_owned(),
            reason: error.to_string(),
        });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
