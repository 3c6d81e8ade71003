//! Visitor identity resolution.
//!
//! Visitors never authenticate against this server directly: their OAuth access
//! token is forwarded to the provider's user-info endpoint, and the profile that
//! comes back is what gets stamped onto comments and login records.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

use crate::errors::AppError;

/// Display name used when the provider returns none.
pub const ANONYMOUS_NAME: &str = "익명";

/// Avatar used when the provider returns none.
pub const DEFAULT_AVATAR: &str = "/assets/default_avatar.png";

/// The public face of a visitor as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorProfile {
    pub name: String,
    pub image: String,
}

/// Resolves a bearer token to a visitor profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` means the provider rejected the token.
    async fn verify(&self, token: &str) -> Result<Option<VisitorProfile>, AppError>;
}

/// Kakao user-info lookup (`GET /v2/user/me`).
pub struct KakaoIdentity {
    client: Client,
    api_base: String,
}

impl KakaoIdentity {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }

    fn user_info_url(&self) -> String {
        format!("{}/v2/user/me", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl IdentityProvider for KakaoIdentity {
    async fn verify(&self, token: &str) -> Result<Option<VisitorProfile>, AppError> {
        if token.trim().is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.user_info_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Kakao user-info returned {}", status);
            return Err(AppError::Upstream(format!(
                "Identity provider returned {}",
                status
            )));
        }
        if !status.is_success() {
            tracing::debug!("Kakao rejected access token with {}", status);
            return Ok(None);
        }

        match response.json::<KakaoUser>().await {
            Ok(user) => Ok(Some(user.into_profile())),
            Err(e) => {
                tracing::warn!("Unreadable Kakao user-info body: {}", e);
                Ok(None)
            }
        }
    }
}

/// Subset of the Kakao user-info payload we read.
#[derive(Debug, Default, Deserialize)]
struct KakaoUser {
    #[serde(default)]
    properties: Option<KakaoProperties>,
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoProperties {
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoAccount {
    #[serde(default)]
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct KakaoProfile {
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    profile_image_url: Option<String>,
}

impl KakaoUser {
    fn into_profile(self) -> VisitorProfile {
        let (prop_name, prop_image) = match self.properties {
            Some(p) => (p.nickname, p.profile_image),
            None => (None, None),
        };
        let (acct_name, acct_image) = match self.kakao_account.and_then(|a| a.profile) {
            Some(p) => (p.nickname, p.profile_image_url),
            None => (None, None),
        };

        let name = first_present(prop_name, acct_name).unwrap_or_else(|| ANONYMOUS_NAME.into());
        let image = first_present(prop_image, acct_image)
            .map(|url| force_https(&url))
            .unwrap_or_else(|| DEFAULT_AVATAR.into());

        VisitorProfile { name, image }
    }
}

fn first_present(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
}

/// Upgrade `http://` avatar URLs so they do not trigger mixed-content blocking.
fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
