//! Error types for verso-core.

/// Coarse error taxonomy shared by every crate in the workspace.
///
/// The HTTP boundary maps `Validation` to a client error and the other two
/// kinds to a server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input field is missing or malformed.
    Validation,
    /// Markup could not be decomposed into content elements.
    Parse,
    /// The search-index store rejected or failed a request.
    ExternalService,
}

/// Failures raised by a [`crate::ElementExtractor`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Markup is larger than the extractor is willing to parse.
    #[error("markup is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// Extraction did not finish within the caller's deadline.
    #[error("extraction timed out after {0}s")]
    Timeout(u64),

    /// The extraction task panicked or was cancelled.
    #[error("extraction task aborted: {0}")]
    Aborted(String),

    /// Failure reported by a custom [`crate::ElementExtractor`] implementation.
    #[error("{0}")]
    Other(String),
}

/// Errors produced by the fragmentation stages.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A document is missing a field the canonical schema requires.
    #[error("document {document:?} is missing required field `{field}`")]
    MissingField {
        document: String,
        field: &'static str,
    },

    /// The configured significant-element selector list does not parse.
    #[error("invalid element selector list {0:?}")]
    InvalidSelector(String),

    /// A pipeline setting is out of range.
    #[error("invalid pipeline setting: {0}")]
    InvalidConfig(String),

    /// A record's markup could not be decomposed.
    #[error("failed to extract content for record {object_id}: {source}")]
    Parse {
        object_id: String,
        #[source]
        source: ExtractError,
    },
}

impl TransformError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } | Self::InvalidSelector(_) | Self::InvalidConfig(_) => {
                ErrorKind::Validation
            }
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_validation() {
        let err = TransformError::MissingField {
            document: "abc".into(),
            field: "slug",
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("`slug`"));
    }

    #[test]
    fn parse_error_keeps_source() {
        let err = TransformError::Parse {
            object_id: "42".into(),
            source: ExtractError::Timeout(3),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("record 42"));
        assert!(err.to_string().contains("timed out after 3s"));
    }
}
