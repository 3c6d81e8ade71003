//! REST API module.
//!
//! Contains all API routes and handlers following the guestbook widget's contract.

mod admin;
mod comments;
mod logins;
mod memos;

pub use admin::*;
pub use comments::*;
pub use logins::*;
pub use memos::*;

use axum::{http::HeaderMap, Json};

use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::identity::VisitorProfile;
use crate::AppState;

/// Handler result: a JSON body or an error response.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Resolve the visitor behind the request's OAuth bearer token.
pub async fn authenticate_visitor(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<VisitorProfile, AppError> {
    let Some(token) = bearer_token(headers) else {
        return Err(AppError::Unauthorized("Missing access token".to_string()));
    };

    match state.identity.verify(token).await? {
        Some(profile) => Ok(profile),
        None => Err(AppError::Unauthorized(
            "Access token rejected by identity provider".to_string(),
        )),
    }
}
