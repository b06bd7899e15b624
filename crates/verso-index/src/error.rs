use verso_core::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Credentials or index name are missing.
    #[error("index configuration error: {0}")]
    Config(String),

    #[error("request to search service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("search service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index store error: {0}")]
    Store(String),
}

impl IndexError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Validation,
            Self::Http(_) | Self::Api { .. } | Self::Serialization(_) | Self::Store(_) => {
                ErrorKind::ExternalService
            }
        }
    }
}
