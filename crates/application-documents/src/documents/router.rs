use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::ApplicationId;
use super::projector::ApplicationDocumentGenerator;

#[derive(Clone)]
pub(crate) struct DocumentRouterState {
    generator: Arc<dyn ApplicationDocumentGenerator>,
    default_base_uri: Arc<str>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentQuery {
    #[serde(default)]
    pub(crate) base_uri: Option<String>,
}

/// Router builder exposing the document download endpoint.
///
/// `default_base_uri` is used when the request carries no `base_uri` query parameter.
pub fn document_router(
    generator: Arc<dyn ApplicationDocumentGenerator>,
    default_base_uri: impl Into<String>,
) -> Router {
    let state = DocumentRouterState {
        generator,
        default_base_uri: Arc::from(default_base_uri.into()),
    };

    Router::new()
        .route(
            "/api/v1/applications/:application_id/document",
            get(document_handler),
        )
        .with_state(state)
}

pub(crate) async fn document_handler(
    State(state): State<DocumentRouterState>,
    Path(application_id): Path<ApplicationId>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    let base_uri = query
        .base_uri
        .unwrap_or_else(|| state.default_base_uri.to_string());
    let generator = state.generator.clone();

    let rendered =
        tokio::task::spawn_blocking(move || generator.generate(&application_id, &base_uri)).await;

    match rendered {
        Ok(Ok(bytes)) if bytes.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(Ok(bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{application_id}.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(err)) => {
            error!(%application_id, error = %err, "document generation failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(%application_id, error = %join_error, "document generation task aborted");
            let payload = json!({ "error": "document generation aborted" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
