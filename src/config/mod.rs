mod env;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use verso_gateway::{ControlSource, FileControls, StaticControls};
use verso_index::{AlgoliaIndex, IndexError};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the `[pipeline]` section holds out-of-range values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config
            .pipeline
            .validate()
            .context("invalid [pipeline] section")?;
        Ok(config)
    }

    /// Build the Algolia client from the `[algolia]` section.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] when credentials or the index name are missing.
    pub fn search_index(&self) -> Result<AlgoliaIndex, IndexError> {
        let api_key = self
            .algolia
            .api_key
            .as_ref()
            .map(Secret::expose)
            .unwrap_or_default();
        let client = verso_index::http::default_client(self.algolia.timeout_secs);
        let index = AlgoliaIndex::new(client, &self.algolia.app_id, api_key, &self.algolia.index)?;
        Ok(match &self.algolia.base_url {
            Some(url) => index.with_base_url(url),
            None => index,
        })
    }

    #[must_use]
    pub fn control_source(&self) -> Arc<dyn ControlSource> {
        match &self.controls.file {
            Some(path) => Arc::new(FileControls::new(path)),
            None => Arc::new(StaticControls::new(
                self.controls.enabled,
                self.controls.ignore_slugs.clone(),
            )),
        }
    }
}

/// `--config`, then `VERSO_CONFIG`, then `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("VERSO_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}
