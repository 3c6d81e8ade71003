//! Visitor login history endpoints.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};

use super::{authenticate_visitor, ApiResult};
use crate::errors::AppError;
use crate::models::{LoginRecord, OkResponse, RecordLoginRequest};
use crate::AppState;

/// POST /api/logins - Record that the token's visitor logged in.
///
/// The body is optional; `{"msg": "..."}` overrides the default message.
pub async fn record_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<OkResponse> {
    let visitor = authenticate_visitor(&state, &headers).await?;

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RecordLoginRequest::default()
    } else {
        serde_json::from_slice::<RecordLoginRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid login body: {}", e)))?
    };

    let record = state.repo.record_login(&visitor, request.message()).await?;
    tracing::info!(id = %record.id, name = %record.name, "Visitor login recorded");

    Ok(Json(OkResponse::new()))
}

/// GET /api/admin/logins - Login history, newest first.
pub async fn list_logins(State(state): State<AppState>) -> ApiResult<Vec<LoginRecord>> {
    let logins = state.repo.list_logins().await?;
    Ok(Json(logins))
}
