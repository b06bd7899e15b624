use std::future::Future;
use std::pin::Pin;

use verso_core::IndexFragment;

use crate::error::IndexError;
use crate::settings::IndexSettings;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Write side of a hosted search index.
///
/// Upserts are keyed by `objectID`, so writing the same fragment twice leaves
/// one record behind.
pub trait SearchIndex: Send + Sync {
    fn push_settings(&self, settings: &IndexSettings) -> BoxFuture<'_, Result<(), IndexError>>;

    /// Returns the number of fragments written.
    fn upsert(&self, fragments: Vec<IndexFragment>) -> BoxFuture<'_, Result<usize, IndexError>>;

    /// Remove every fragment whose `slug` equals `slug`.
    fn delete_by_slug(&self, slug: &str) -> BoxFuture<'_, Result<(), IndexError>>;

    fn delete_objects(&self, object_ids: Vec<String>) -> BoxFuture<'_, Result<(), IndexError>>;
}
