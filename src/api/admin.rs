//! Admin session endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use super::ApiResult;
use crate::auth::AdminToken;
use crate::AppState;

/// Request body for admin login.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /api/admin/login - Exchange the admin password for a token.
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> ApiResult<AdminToken> {
    let Json(request) = payload?;
    let token = state.admin.login(&request.password)?;
    tracing::info!("Admin token issued");
    Ok(Json(token))
}
