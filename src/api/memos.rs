//! Admin memo endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{AdminMemo, CreateMemoRequest, OkResponse, UpdateMemoRequest};
use crate::AppState;

/// GET /api/admin/memos - List all memos.
pub async fn list_memos(State(state): State<AppState>) -> ApiResult<Vec<AdminMemo>> {
    let memos = state.repo.list_memos().await?;
    Ok(Json(memos))
}

/// GET /api/admin/memos/:id - Get a single memo.
pub async fn get_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AdminMemo> {
    match state.repo.get_memo(&id).await? {
        Some(memo) => Ok(Json(memo)),
        None => Err(AppError::NotFound(format!("Memo {} not found", id))),
    }
}

/// POST /api/admin/memos - Create a memo.
pub async fn create_memo(
    State(state): State<AppState>,
    payload: Result<Json<CreateMemoRequest>, JsonRejection>,
) -> ApiResult<AdminMemo> {
    let Json(request) = payload?;
    let memo = state.repo.create_memo(&request).await?;
    tracing::info!(id = %memo.id, "Memo created");
    Ok(Json(memo))
}

/// PUT /api/admin/memos/:id - Update a memo.
pub async fn update_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMemoRequest>, JsonRejection>,
) -> ApiResult<AdminMemo> {
    let Json(request) = payload?;
    let memo = state.repo.update_memo(&id, &request).await?;
    tracing::info!(id = %memo.id, "Memo updated");
    Ok(Json(memo))
}

/// DELETE /api/admin/memos/:id - Delete a memo.
pub async fn delete_memo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OkResponse> {
    state.repo.delete_memo(&id).await?;
    tracing::info!(id = %id, "Memo deleted");
    Ok(Json(OkResponse::new()))
}
