//! Fragment accumulator: folds extraction, grouping and assembly over a batch.

mod accumulation;
mod config;

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

pub use accumulation::{Accumulation, SkippedRecord};
pub use config::{FailurePolicy, PipelineConfig};

use crate::assembler::assemble;
use crate::error::{ExtractError, TransformError};
use crate::extractor::{ElementExtractor, ElementSelectors, HtmlExtractor};
use crate::grouper::group_elements;
use crate::selector::select_records;
use crate::types::{CanonicalRecord, IndexFragment, SourceDocument};

/// Turns canonical records into an ordered list of index fragments.
///
/// Output order is a contract: records in input order, and within a record
/// fragments in group order. This holds for the concurrent path as well.
#[derive(Clone)]
pub struct FragmentPipeline {
    extractor: Arc<dyn ElementExtractor>,
    selectors: ElementSelectors,
    config: PipelineConfig,
}

impl std::fmt::Debug for FragmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentPipeline")
            .field("selectors", &self.selectors.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FragmentPipeline {
    #[must_use]
    pub fn new(
        extractor: Arc<dyn ElementExtractor>,
        selectors: ElementSelectors,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            selectors,
            config,
        }
    }

    /// Build a pipeline backed by [`HtmlExtractor`].
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidConfig`] for out-of-range settings and
    /// [`TransformError::InvalidSelector`] if `config.selectors` does not parse.
    pub fn from_config(config: PipelineConfig) -> Result<Self, TransformError> {
        config.validate()?;
        let selectors = ElementSelectors::parse(&config.selectors)?;
        let extractor = HtmlExtractor::new().with_max_html_bytes(config.max_html_bytes);
        Ok(Self::new(Arc::new(extractor), selectors, config))
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract, group and assemble a single record.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Parse`] if the extractor fails.
    pub fn fragments_for_record(
        &self,
        record: &CanonicalRecord,
    ) -> Result<Vec<IndexFragment>, TransformError> {
        let elements = self
            .extractor
            .extract(&record.html, &self.selectors)
            .map_err(|source| parse_error(&record.object_id, source))?;
        Ok(assemble(record, group_elements(elements)))
    }

    /// Sequential fold over `records`.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the first record failure.
    pub fn run(&self, records: &[CanonicalRecord]) -> Result<Accumulation, TransformError> {
        records.iter().try_fold(Accumulation::default(), |acc, record| {
            self.settle(
                acc,
                &record.object_id,
                &record.slug,
                self.fragments_for_record(record),
            )
        })
    }

    /// Extract records concurrently on the blocking pool, then fold the
    /// outcomes in input order.
    ///
    /// Each extraction is bounded by `extract_timeout_secs`; a timeout counts
    /// as a parse failure and never yields partial fragments.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the failure of the earliest
    /// failing record.
    pub async fn run_concurrent(
        &self,
        records: Vec<CanonicalRecord>,
    ) -> Result<Accumulation, TransformError> {
        let timeout = Duration::from_secs(self.config.extract_timeout_secs.max(1));

        let outcomes: Vec<_> = stream::iter(records)
            .map(|record| {
                let pipeline = self.clone();
                async move {
                    let object_id = record.object_id.clone();
                    let slug = record.slug.clone();
                    let task =
                        tokio::task::spawn_blocking(move || pipeline.fragments_for_record(&record));
                    let outcome = match tokio::time::timeout(timeout, task).await {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(join)) => Err(parse_error(
                            &object_id,
                            ExtractError::Aborted(join.to_string()),
                        )),
                        Err(_) => Err(parse_error(
                            &object_id,
                            ExtractError::Timeout(timeout.as_secs()),
                        )),
                    };
                    (object_id, slug, outcome)
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        outcomes
            .into_iter()
            .try_fold(Accumulation::default(), |acc, (object_id, slug, outcome)| {
                self.settle(acc, &object_id, &slug, outcome)
            })
    }

    /// Full transform: drop ignored documents, canonicalize, then accumulate.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed documents, and record
    /// failures according to the failure policy.
    pub fn fragments_for(
        &self,
        documents: &[SourceDocument],
        ignore_slugs: &[String],
    ) -> Result<Accumulation, TransformError> {
        let records = select_records(documents, ignore_slugs)?;
        self.run(&records)
    }

    fn settle(
        &self,
        acc: Accumulation,
        object_id: &str,
        slug: &str,
        outcome: Result<Vec<IndexFragment>, TransformError>,
    ) -> Result<Accumulation, TransformError> {
        match (outcome, self.config.failure_policy) {
            (Ok(fragments), _) => Ok(acc.append(fragments)),
            (Err(e), FailurePolicy::Skip) => Ok(acc.skip(object_id, slug, &e)),
            (Err(e), FailurePolicy::Abort) => Err(e),
        }
    }
}

fn parse_error(object_id: &str, source: ExtractError) -> TransformError {
    TransformError::Parse {
        object_id: object_id.to_owned(),
        source,
    }
}
