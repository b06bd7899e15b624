use std::collections::BTreeMap;
use std::sync::RwLock;

use verso_core::IndexFragment;

use crate::error::IndexError;
use crate::settings::IndexSettings;
use crate::store::{BoxFuture, SearchIndex};

/// Map-backed index keyed by `objectID`.
pub struct InMemoryIndex {
    objects: RwLock<BTreeMap<String, IndexFragment>>,
    settings: RwLock<Option<IndexSettings>>,
}

impl InMemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            settings: RwLock::new(None),
        }
    }

    /// Snapshot of stored fragments, ordered by `objectID`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Store`] if the lock is poisoned.
    pub fn objects(&self) -> Result<Vec<IndexFragment>, IndexError> {
        let objects = self
            .objects
            .read()
            .map_err(|e| IndexError::Store(e.to_string()))?;
        Ok(objects.values().cloned().collect())
    }

    /// Settings from the last `push_settings` call, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Store`] if the lock is poisoned.
    pub fn settings(&self) -> Result<Option<IndexSettings>, IndexError> {
        let settings = self
            .settings
            .read()
            .map_err(|e| IndexError::Store(e.to_string()))?;
        Ok(settings.clone())
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryIndex").finish_non_exhaustive()
    }
}

impl SearchIndex for InMemoryIndex {
    fn push_settings(&self, settings: &IndexSettings) -> BoxFuture<'_, Result<(), IndexError>> {
        let settings = settings.clone();
        Box::pin(async move {
            let mut current = self
                .settings
                .write()
                .map_err(|e| IndexError::Store(e.to_string()))?;
            *current = Some(settings);
            Ok(())
        })
    }

    fn upsert(&self, fragments: Vec<IndexFragment>) -> BoxFuture<'_, Result<usize, IndexError>> {
        Box::pin(async move {
            let mut objects = self
                .objects
                .write()
                .map_err(|e| IndexError::Store(e.to_string()))?;
            let count = fragments.len();
            for f in fragments {
                objects.insert(f.object_id.clone(), f);
            }
            Ok(count)
        })
    }

    fn delete_by_slug(&self, slug: &str) -> BoxFuture<'_, Result<(), IndexError>> {
        let slug = slug.to_owned();
        Box::pin(async move {
            let mut objects = self
                .objects
                .write()
                .map_err(|e| IndexError::Store(e.to_string()))?;
            objects.retain(|_, f| f.slug != slug);
            Ok(())
        })
    }

    fn delete_objects(&self, object_ids: Vec<String>) -> BoxFuture<'_, Result<(), IndexError>> {
        Box::pin(async move {
            let mut objects = self
                .objects
                .write()
                .map_err(|e| IndexError::Store(e.to_string()))?;
            for id in &object_ids {
                objects.remove(id);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use verso_core::CustomRanking;

    use super::*;

    fn fragment(id: &str, slug: &str, html: &str) -> IndexFragment {
        IndexFragment {
            object_id: id.into(),
            slug: slug.into(),
            url: format!("https://blog.example/{slug}/"),
            html: html.into(),
            image: None,
            title: slug.into(),
            created_at: None,
            updated_at: None,
            tags: Vec::new(),
            authors: Vec::new(),
            anchor: String::new(),
            headings: Vec::new(),
            custom_ranking: CustomRanking::default(),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_object_id() {
        let idx = InMemoryIndex::new();
        idx.upsert(vec![fragment("1_0", "a", "<p>v1</p>")]).await.unwrap();
        idx.upsert(vec![fragment("1_0", "a", "<p>v2</p>")]).await.unwrap();

        let objects = idx.objects().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].html, "<p>v2</p>");
    }

    #[tokio::test]
    async fn delete_by_slug_removes_all_fragments_of_article() {
        let idx = InMemoryIndex::new();
        idx.upsert(vec![
            fragment("1_0", "a", "x"),
            fragment("1_1", "a", "y"),
            fragment("2_0", "b", "z"),
        ])
        .await
        .unwrap();

        idx.delete_by_slug("a").await.unwrap();
        let ids: Vec<_> = idx
            .objects()
            .unwrap()
            .into_iter()
            .map(|f| f.object_id)
            .collect();
        assert_eq!(ids, ["2_0"]);
    }

    #[tokio::test]
    async fn delete_objects_by_id() {
        let idx = InMemoryIndex::new();
        idx.upsert(vec![fragment("1_0", "a", "x"), fragment("1_1", "a", "y")])
            .await
            .unwrap();
        idx.delete_objects(vec!["1_1".into(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(idx.objects().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn settings_are_recorded() {
        let idx = InMemoryIndex::new();
        assert!(idx.settings().unwrap().is_none());
        idx.push_settings(&IndexSettings::default()).await.unwrap();
        assert_eq!(idx.settings().unwrap(), Some(IndexSettings::default()));
    }
}
