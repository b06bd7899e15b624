use std::path::PathBuf;

use serde::Deserialize;
use verso_index::BoxFuture;

/// Runtime switches consulted on every webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    pub enabled: bool,
    pub ignore_slugs: Vec<String>,
}

/// Where enablement and the ignore list come from.
pub trait ControlSource: Send + Sync {
    fn controls(&self) -> BoxFuture<'_, Controls>;
}

/// Split a comma-separated slug list, trimming entries and dropping empties.
#[must_use]
pub fn parse_slug_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Controls fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticControls(Controls);

impl StaticControls {
    #[must_use]
    pub fn new(enabled: bool, ignore_slugs: Vec<String>) -> Self {
        Self(Controls {
            enabled,
            ignore_slugs,
        })
    }
}

impl ControlSource for StaticControls {
    fn controls(&self) -> BoxFuture<'_, Controls> {
        Box::pin(async move { self.0.clone() })
    }
}

/// Controls re-read from a TOML file on every request.
///
/// ```toml
/// enabled = true
/// ignore_slugs = "about,contact"   # or ["about", "contact"]
/// ```
///
/// A missing or unreadable file means indexing is disabled.
#[derive(Debug, Clone)]
pub struct FileControls {
    path: PathBuf,
}

#[derive(Deserialize)]
struct ControlsFile {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    ignore_slugs: SlugList,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlugList {
    Csv(String),
    List(Vec<String>),
}

impl Default for SlugList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl SlugList {
    fn into_slugs(self) -> Vec<String> {
        match self {
            Self::Csv(raw) => parse_slug_list(&raw),
            Self::List(items) => parse_slug_list(&items.join(",")),
        }
    }
}

impl FileControls {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Controls {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "controls file unavailable: {e}");
                return Controls::default();
            }
        };
        match toml::from_str::<ControlsFile>(&raw) {
            Ok(file) => Controls {
                enabled: file.enabled,
                ignore_slugs: file.ignore_slugs.into_slugs(),
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "invalid controls file: {e}");
                Controls::default()
            }
        }
    }
}

impl ControlSource for FileControls {
    fn controls(&self) -> BoxFuture<'_, Controls> {
        Box::pin(self.load())
    }
}
