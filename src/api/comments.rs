//! Guestbook comment endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};

use super::{authenticate_visitor, ApiResult};
use crate::errors::{codes, AppError};
use crate::models::{
    Comment, CreateCommentRequest, CreateCommentResponse, OkResponse, MAX_COMMENT_CHARS,
};
use crate::AppState;

/// GET /api/comments - List all comments, newest first.
pub async fn list_comments(State(state): State<AppState>) -> ApiResult<Vec<Comment>> {
    let comments = state.repo.list_comments().await?;
    Ok(Json(comments))
}

/// POST /api/comments - Post a comment as the token's visitor.
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<CreateCommentResponse> {
    let author = authenticate_visitor(&state, &headers).await?;
    let Json(request) = payload?;

    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::required(codes::TEXT_REQUIRED, "Text is required"));
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(format!(
            "Text must be at most {} characters",
            MAX_COMMENT_CHARS
        )));
    }

    let comment = state.repo.create_comment(&author, text).await?;
    tracing::info!(id = %comment.id, name = %comment.name, "Comment posted");

    Ok(Json(CreateCommentResponse { ok: true, comment }))
}

/// DELETE /api/comments/:id - Remove a comment (admin only).
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OkResponse> {
    state.repo.delete_comment(&id).await?;
    tracing::info!(id = %id, "Comment deleted by admin");
    Ok(Json(OkResponse::new()))
}
