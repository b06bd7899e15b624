use serde::Deserialize;
use serde_json::Value;
use verso_core::SourceDocument;

use crate::error::ApiError;

/// Lifecycle webhook body: `{ "post": { "current": {...}, "previous": {...} } }`.
///
/// Either side may be absent or an empty object depending on the event.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    post: Option<PostEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
struct PostEnvelope {
    #[serde(default)]
    current: Option<Value>,
    #[serde(default)]
    previous: Option<Value>,
}

impl WebhookPayload {
    /// # Errors
    ///
    /// Returns [`ApiError::NotJson`] if `body` is not a JSON object of the expected shape.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|_| ApiError::NotJson)
    }

    /// The post after the event, decoded as a source document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EmptyBody`] when `post.current` is absent or empty,
    /// and [`ApiError::InvalidDocument`] when it has the wrong field types.
    pub fn current_document(&self) -> Result<SourceDocument, ApiError> {
        let current = self.side(|p| p.current.as_ref()).ok_or(ApiError::EmptyBody)?;
        serde_json::from_value(current.clone()).map_err(ApiError::InvalidDocument)
    }

    /// Slug of the current post, or of the previous one when the current side is empty.
    #[must_use]
    pub fn removal_slug(&self) -> Option<String> {
        self.current_slug().or_else(|| self.previous_slug())
    }

    /// Slug of the post before the event, falling back to the current slug.
    #[must_use]
    pub fn stale_slug(&self) -> Option<String> {
        self.previous_slug().or_else(|| self.current_slug())
    }

    fn current_slug(&self) -> Option<String> {
        self.side(|p| p.current.as_ref()).and_then(slug_of)
    }

    fn previous_slug(&self) -> Option<String> {
        self.side(|p| p.previous.as_ref()).and_then(slug_of)
    }

    fn side(&self, pick: impl Fn(&PostEnvelope) -> Option<&Value>) -> Option<&Value> {
        self.post
            .as_ref()
            .and_then(pick)
            .filter(|v| v.as_object().is_some_and(|o| !o.is_empty()))
    }
}

fn slug_of(value: &Value) -> Option<String> {
    value
        .get("slug")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> WebhookPayload {
        WebhookPayload::from_body(json.as_bytes()).unwrap()
    }

    #[test]
    fn non_json_rejected() {
        let err = WebhookPayload::from_body(b"not json").unwrap_err();
        assert!(matches!(err, ApiError::NotJson));
    }

    #[test]
    fn current_document_decodes_post() {
        let p = payload(
            r#"{"post":{"current":{"id":"1","slug":"a","html":"<p>x</p>","title":"A",
                "tags":[{"id":"t","name":"News","slug":"news","visibility":"public"}]},"previous":{}}}"#,
        );
        let doc = p.current_document().unwrap();
        assert_eq!(doc.id, "1");
        assert_eq!(doc.tags[0].name, "News");
    }

    #[test]
    fn empty_current_is_empty_body() {
        for body in [r#"{"post":{"current":{}}}"#, r#"{"post":{}}"#, "{}"] {
            assert!(matches!(
                payload(body).current_document().unwrap_err(),
                ApiError::EmptyBody
            ));
        }
    }

    #[test]
    fn wrong_field_type_is_invalid_document() {
        let p = payload(r#"{"post":{"current":{"id":"1","tags":"news"}}}"#);
        assert!(matches!(
            p.current_document().unwrap_err(),
            ApiError::InvalidDocument(_)
        ));
    }

    #[test]
    fn removal_slug_prefers_current() {
        let p = payload(r#"{"post":{"current":{"slug":"new"},"previous":{"slug":"old"}}}"#);
        assert_eq!(p.removal_slug().as_deref(), Some("new"));
        assert_eq!(p.stale_slug().as_deref(), Some("old"));
    }

    #[test]
    fn removal_slug_falls_back_to_previous() {
        let p = payload(r#"{"post":{"current":{},"previous":{"slug":"gone"}}}"#);
        assert_eq!(p.removal_slug().as_deref(), Some("gone"));
    }

    #[test]
    fn stale_slug_falls_back_to_current() {
        let p = payload(r#"{"post":{"current":{"slug":"same"}}}"#);
        assert_eq!(p.stale_slug().as_deref(), Some("same"));
    }

    #[test]
    fn no_slug_anywhere() {
        let p = payload(r#"{"post":{"current":{"slug":""},"previous":{}}}"#);
        assert!(p.removal_slug().is_none());
    }
}
