//! Fragmentation core: turns published articles into heading-anchored index fragments.
//!
//! Data flows leaf-first through four stages: the [`selector`] projects raw
//! documents onto canonical records, the [`extractor`] decomposes each record's
//! markup into content elements, the [`grouper`] merges elements sharing an
//! anchor, and the [`assembler`] turns every group into an [`IndexFragment`].
//! [`pipeline::FragmentPipeline`] folds the stages over a batch of records.

pub mod assembler;
pub mod error;
pub mod extractor;
pub mod grouper;
pub mod pipeline;
pub mod selector;
pub mod types;

pub use error::{ErrorKind, ExtractError, TransformError};
pub use extractor::{ElementExtractor, ElementSelectors, HtmlExtractor};
pub use pipeline::{Accumulation, FailurePolicy, FragmentPipeline, PipelineConfig, SkippedRecord};
pub use types::{
    CanonicalRecord, ContentElement, CustomRanking, FragmentGroup, IndexFragment, SourceDocument,
    Taxonomy,
};
