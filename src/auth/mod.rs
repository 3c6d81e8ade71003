//! Administrator authentication.
//!
//! The admin proves knowledge of the shared password once and receives a
//! short-lived HS256 token; admin routes then only check that token.
//! Password comparison is constant-time.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Claims carried by an admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued admin token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminToken {
    pub token: String,
    /// Expiry as Unix epoch milliseconds
    pub expires_at: i64,
}

/// Issues and checks admin tokens.
pub struct AdminAuth {
    password: Option<String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// `None` when the configured lifetime does not fit a `Duration`
    ttl: Option<Duration>,
}

impl AdminAuth {
    /// Without a password admin login is impossible. Without a secret a random
    /// one is used, so tokens do not survive a restart.
    pub fn new(password: Option<String>, secret: Option<String>, ttl_secs: i64) -> Self {
        let secret = secret.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            password,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::try_seconds(ttl_secs),
        }
    }

    /// Whether an admin password is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }

    /// Exchange the shared password for a token.
    pub fn login(&self, password: &str) -> Result<AdminToken, AppError> {
        let Some(expected) = self.password.as_deref() else {
            tracing::warn!("Admin login attempted but no admin password is configured");
            return Err(AppError::WrongPassword);
        };

        if !constant_time_compare(password, expected) {
            tracing::warn!("Admin login rejected: wrong password");
            return Err(AppError::WrongPassword);
        }

        self.issue()
    }

    /// Sign a new admin token.
    pub fn issue(&self) -> Result<AdminToken, AppError> {
        let now = Utc::now();
        let expires = self
            .ttl
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Internal("Admin token lifetime out of range".to_string()))?;
        let claims = AdminClaims {
            admin: true,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign admin token: {}", e)))?;

        Ok(AdminToken {
            token,
            expires_at: claims.exp * 1000,
        })
    }

    /// Check signature, expiry and the admin flag.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AppError> {
        let data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!("Admin token rejected: {}", e);
                AppError::NotAdmin("Invalid or expired admin token".to_string())
            },
        )?;

        if !data.claims.admin {
            return Err(AppError::NotAdmin("Token lacks admin rights".to_string()));
        }
        Ok(data.claims)
    }

    #[cfg(test)]
    fn sign_claims(&self, claims: &AdminClaims) -> String {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).unwrap()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Admin authentication layer function that takes the token checker as a parameter.
pub async fn admin_auth_layer(admin: Arc<AdminAuth>, request: Request, next: Next) -> Response {
    let verdict = match bearer_token(request.headers()) {
        Some(token) => admin.verify(token).map(|_| ()),
        None => Err(AppError::NotAdmin("Missing admin token".to_string())),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn admin() -> AdminAuth {
        AdminAuth::new(Some("letmein".to_string()), Some("secret".to_string()), 3600)
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let auth = admin();
        let issued = auth.login("letmein").unwrap();
        let claims = auth.verify(&issued.token).unwrap();

        assert!(claims.admin);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(issued.expires_at, claims.exp * 1000);
    }

    #[test]
    fn test_login_wrong_password() {
        assert!(matches!(
            admin().login("nope"),
            Err(AppError::WrongPassword)
        ));
    }

    #[test]
    fn test_login_disabled_without_password() {
        let auth = AdminAuth::new(None, None, 3600);
        assert!(!auth.is_enabled());
        assert!(matches!(auth.login(""), Err(AppError::WrongPassword)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AdminAuth::new(Some("letmein".to_string()), Some("other".to_string()), 3600);
        let issued = other.issue().unwrap();
        assert!(matches!(
            admin().verify(&issued.token),
            Err(AppError::NotAdmin(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = admin();
        let now = Utc::now().timestamp();
        let token = auth.sign_claims(&AdminClaims {
            admin: true,
            iat: now - 7200,
            exp: now - 10,
        });
        assert!(matches!(auth.verify(&token), Err(AppError::NotAdmin(_))));
    }

    #[test]
    fn test_non_admin_claim_rejected() {
        let auth = admin();
        let now = Utc::now().timestamp();
        let token = auth.sign_claims(&AdminClaims {
            admin: false,
            iat: now,
            exp: now + 60,
        });
        assert!(matches!(auth.verify(&token), Err(AppError::NotAdmin(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, "BEARER  abc.def ".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_oversized_ttl_fails_without_panicking() {
        let auth = AdminAuth::new(Some("pw".to_string()), None, i64::MAX);
        assert!(matches!(auth.login("pw"), Err(AppError::Internal(_))));

        let auth = AdminAuth::new(Some("pw".to_string()), None, 10_000_000_000_000);
        assert!(matches!(auth.login("pw"), Err(AppError::Internal(_))));
    }

    fn guarded(auth: Arc<AdminAuth>) -> Router {
        Router::new()
            .route("/secret", get(|| async { "ok" }))
            .layer(middleware::from_fn(move |req, next| {
                admin_auth_layer(auth.clone(), req, next)
            }))
    }

    #[tokio::test]
    async fn test_layer_rejects_missing_token() {
        let resp = guarded(Arc::new(admin()))
            .oneshot(
                HttpRequest::builder()
                    .uri("/secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_layer_accepts_valid_token() {
        let auth = Arc::new(admin());
        let token = auth.issue().unwrap().token;

        let resp = guarded(auth)
            .oneshot(
                HttpRequest::builder()
                    .uri("/secret")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
