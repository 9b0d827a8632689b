//! `POST /api/generate` — the single user-facing endpoint.

use super::{request_origin, AppState};
use crate::models::GenerateRequest;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Response {
    if request.phrase().is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Phrase is required" })),
        )
            .into_response();
    }

    let origin = request_origin(&headers);
    match state.app.generate(&request, origin).await {
        Ok(url) => (StatusCode::OK, Json(json!({ "url": url }))).into_response(),
        Err(e) => {
            error!("Error generating image: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
