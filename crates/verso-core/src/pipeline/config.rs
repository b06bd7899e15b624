use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::extractor::{DEFAULT_MAX_HTML_BYTES, DEFAULT_SELECTORS};

/// What the accumulator does when one record fails extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failing record.
    #[default]
    Abort,
    /// Omit the failing record and report it alongside the fragments.
    Skip,
}

impl FailurePolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Records extracted at once by [`super::FragmentPipeline::run_concurrent`].
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_extract_timeout_secs")]
    pub extract_timeout_secs: u64,
    #[serde(default = "default_selectors")]
    pub selectors: String,
    #[serde(default = "default_max_html_bytes")]
    pub max_html_bytes: usize,
}

fn default_concurrency() -> usize {
    4
}

fn default_extract_timeout_secs() -> u64 {
    10
}

fn default_selectors() -> String {
    DEFAULT_SELECTORS.into()
}

fn default_max_html_bytes() -> usize {
    DEFAULT_MAX_HTML_BYTES
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            concurrency: default_concurrency(),
            extract_timeout_secs: default_extract_timeout_secs(),
            selectors: default_selectors(),
            max_html_bytes: default_max_html_bytes(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings the accumulator cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), TransformError> {
        if self.concurrency == 0 {
            return Err(TransformError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.extract_timeout_secs == 0 {
            return Err(TransformError::InvalidConfig(
                "extract_timeout_secs must be at least 1".into(),
            ));
        }
        if self.max_html_bytes == 0 {
            return Err(TransformError::InvalidConfig(
                "max_html_bytes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
