use serde::Deserialize;
use serde_json::json;
use verso_core::IndexFragment;

use crate::error::IndexError;
use crate::settings::IndexSettings;
use crate::store::{BoxFuture, SearchIndex};

/// Objects sent per batch request.
const BATCH_SIZE: usize = 1000;

/// REST client for one Algolia index.
pub struct AlgoliaIndex {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
    index: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl std::fmt::Debug for AlgoliaIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgoliaIndex")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("api_key", &"[REDACTED]")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl AlgoliaIndex {
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if any of `app_id`, `api_key` or `index` is empty.
    pub fn new(
        client: reqwest::Client,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        index: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let app_id = app_id.into();
        let api_key = api_key.into();
        let index = index.into();

        for (name, value) in [("app_id", &app_id), ("api_key", &api_key), ("index", &index)] {
            if value.trim().is_empty() {
                return Err(IndexError::Config(format!("algolia {name} is not set")));
            }
        }

        Ok(Self {
            client,
            base_url: format!("https://{app_id}.algolia.net"),
            app_id,
            api_key,
            index,
        })
    }

    /// Override the service root, e.g. to point at a mock server.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn endpoint(&self, action: &str) -> String {
        let index: String = url::form_urlencoded::byte_serialize(self.index.as_bytes()).collect();
        format!("{}/1/indexes/{index}/{action}", self.base_url)
    }

    async fn send(
        &self,
        method: reqwest::Method,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<(), IndexError> {
        let resp = self
            .client
            .request(method, self.endpoint(action))
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let bytes = resp.bytes().await?;
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
        tracing::warn!(
            index = %self.index,
            action,
            status = status.as_u16(),
            "search service rejected request: {message}"
        );
        Err(IndexError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn batch(&self, requests: Vec<serde_json::Value>) -> Result<(), IndexError> {
        for chunk in requests.chunks(BATCH_SIZE) {
            self.send(
                reqwest::Method::POST,
                "batch",
                &json!({ "requests": chunk }),
            )
            .await?;
        }
        Ok(())
    }
}

fn slug_filter(slug: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filters", &format!("slug:{slug}"))
        .finish()
}

impl SearchIndex for AlgoliaIndex {
    fn push_settings(&self, settings: &IndexSettings) -> BoxFuture<'_, Result<(), IndexError>> {
        let body = serde_json::to_value(settings);
        Box::pin(async move {
            self.send(reqwest::Method::PUT, "settings", &body?).await?;
            tracing::debug!(index = %self.index, "index settings pushed");
            Ok(())
        })
    }

    fn upsert(&self, fragments: Vec<IndexFragment>) -> BoxFuture<'_, Result<usize, IndexError>> {
        Box::pin(async move {
            if fragments.is_empty() {
                return Ok(0);
            }
            let count = fragments.len();
            let requests = fragments
                .into_iter()
                .map(|f| {
                    serde_json::to_value(f).map(|body| json!({ "action": "updateObject", "body": body }))
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.batch(requests).await?;
            tracing::info!(index = %self.index, count, "fragments upserted");
            Ok(count)
        })
    }

    fn delete_by_slug(&self, slug: &str) -> BoxFuture<'_, Result<(), IndexError>> {
        let params = slug_filter(slug);
        let slug = slug.to_owned();
        Box::pin(async move {
            self.send(
                reqwest::Method::POST,
                "deleteByQuery",
                &json!({ "params": params }),
            )
            .await?;
            tracing::info!(index = %self.index, slug = %slug, "fragments deleted by slug");
            Ok(())
        })
    }

    fn delete_objects(&self, object_ids: Vec<String>) -> BoxFuture<'_, Result<(), IndexError>> {
        Box::pin(async move {
            if object_ids.is_empty() {
                return Ok(());
            }
            let requests = object_ids
                .into_iter()
                .map(|id| json!({ "action": "deleteObject", "body": { "objectID": id } }))
                .collect();
            self.batch(requests).await
        })
    }
}
