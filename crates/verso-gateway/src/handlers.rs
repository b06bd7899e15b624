use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;

use super::server::AppState;
use crate::error::ApiError;
use crate::payload::WebhookPayload;

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

pub(crate) async fn published_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let controls = state.controls.controls().await;
    if !controls.enabled {
        return Err(ApiError::Disabled);
    }

    let payload = WebhookPayload::from_body(&body)?;
    let document = payload.current_document()?;
    let title = document.title.clone().unwrap_or_default();

    let fragments = state
        .service
        .publish_post(&document, &controls.ignore_slugs)
        .await?;
    tracing::info!(slug = %document.slug, fragments, "post published");
    Ok(format!("Post \"{title}\" has been added to the index."))
}

pub(crate) async fn unpublished_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    if !state.controls.controls().await.enabled {
        return Err(ApiError::Disabled);
    }

    let payload = WebhookPayload::from_body(&body)?;
    let slug = payload.removal_slug().ok_or(ApiError::EmptyBody)?;

    state.service.unpublish(&slug).await?;
    tracing::info!(slug = %slug, "post unpublished");
    Ok(format!("Post \"{slug}\" has been removed from the index."))
}

pub(crate) async fn edited_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let controls = state.controls.controls().await;
    if !controls.enabled {
        return Err(ApiError::Disabled);
    }

    let payload = WebhookPayload::from_body(&body)?;
    let document = payload.current_document()?;
    let stale = payload.stale_slug().ok_or(ApiError::EmptyBody)?;
    let title = document.title.clone().unwrap_or_default();

    let fragments = state
        .service
        .edit(&stale, &document, &controls.ignore_slugs)
        .await?;
    tracing::info!(
        stale_slug = %stale,
        slug = %document.slug,
        fragments,
        "post re-indexed"
    );
    Ok(format!("Post \"{title}\" has been updated in the index."))
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok",
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
    }
}
