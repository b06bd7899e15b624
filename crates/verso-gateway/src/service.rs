use std::sync::Arc;

use verso_core::selector::select_records;
use verso_core::{FragmentPipeline, IndexFragment, SkippedRecord, SourceDocument};
use verso_index::{IndexSettings, SearchIndex};

use crate::error::ApiError;

/// Result of publishing one article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishOutcome {
    pub fragments: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Applies article lifecycle events to a search index.
#[derive(Clone)]
pub struct IndexingService {
    pipeline: FragmentPipeline,
    index: Arc<dyn SearchIndex>,
    settings: IndexSettings,
}

impl std::fmt::Debug for IndexingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingService")
            .field("pipeline", &self.pipeline)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl IndexingService {
    #[must_use]
    pub fn new(
        pipeline: FragmentPipeline,
        index: Arc<dyn SearchIndex>,
        settings: IndexSettings,
    ) -> Self {
        Self {
            pipeline,
            index,
            settings,
        }
    }

    /// Fragment `documents`, push index settings, then upsert the fragments.
    ///
    /// Ignored documents produce no fragments; settings are still pushed.
    ///
    /// # Errors
    ///
    /// Returns the transformation error (nothing is written) or the index error.
    pub async fn publish(
        &self,
        documents: &[SourceDocument],
        ignore_slugs: &[String],
    ) -> Result<PublishOutcome, ApiError> {
        let records = select_records(documents, ignore_slugs)?;
        let acc = self.pipeline.run_concurrent(records).await?;
        for skipped in &acc.skipped {
            tracing::warn!(
                object_id = %skipped.object_id,
                slug = %skipped.slug,
                "record skipped: {}",
                skipped.reason
            );
        }

        self.index.push_settings(&self.settings).await?;
        let fragments = self.index.upsert(acc.fragments).await?;
        Ok(PublishOutcome {
            fragments,
            skipped: acc.skipped,
        })
    }

    /// Publish a single post delivered by a webhook.
    ///
    /// Unlike [`Self::publish`], a record skipped by the failure policy is an
    /// error here and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unindexable`] for a skipped record, otherwise the
    /// transformation or index error.
    pub async fn publish_post(
        &self,
        document: &SourceDocument,
        ignore_slugs: &[String],
    ) -> Result<usize, ApiError> {
        let fragments = self.fragment_post(document, ignore_slugs).await?;
        self.index.push_settings(&self.settings).await?;
        Ok(self.index.upsert(fragments).await?)
    }

    /// Remove every fragment of the article with `slug`.
    ///
    /// # Errors
    ///
    /// Returns the index error.
    pub async fn unpublish(&self, slug: &str) -> Result<(), ApiError> {
        self.index.delete_by_slug(slug).await?;
        Ok(())
    }

    /// Drop the fragments stored under `stale_slug`, then publish `document` afresh.
    ///
    /// Fragmentation runs first, so a malformed or skipped document leaves the
    /// index untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unindexable`] for a skipped record, otherwise the
    /// transformation or index error.
    pub async fn edit(
        &self,
        stale_slug: &str,
        document: &SourceDocument,
        ignore_slugs: &[String],
    ) -> Result<usize, ApiError> {
        let fragments = self.fragment_post(document, ignore_slugs).await?;

        self.index.delete_by_slug(stale_slug).await?;
        self.index.push_settings(&self.settings).await?;
        Ok(self.index.upsert(fragments).await?)
    }

    async fn fragment_post(
        &self,
        document: &SourceDocument,
        ignore_slugs: &[String],
    ) -> Result<Vec<IndexFragment>, ApiError> {
        let records = select_records(std::slice::from_ref(document), ignore_slugs)?;
        let acc = self.pipeline.run_concurrent(records).await?;
        match acc.skipped.into_iter().next() {
            Some(skipped) => Err(ApiError::Unindexable(skipped)),
            None => Ok(acc.fragments),
        }
    }
}
