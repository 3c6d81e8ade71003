//! Guestbook Backend
//!
//! REST backend for the guestbook widget: Kakao-authenticated comments, visitor
//! login history and password-gated admin moderation, persisted in one JSON file.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod identity;
mod models;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AdminAuth;
use config::Config;
use db::Repository;
use identity::{IdentityProvider, KakaoIdentity};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub admin: Arc<AdminAuth>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting guestbook backend");
    tracing::info!("Document path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Identity provider: {}", config.kakao_api_base);

    // Load the document
    let document = db::init_store(&config.db_path).await?;
    tracing::info!(
        "Loaded {} comments, {} logins, {} memos",
        document.comments.len(),
        document.logins.len(),
        document.admin_memos.len()
    );
    let repo = Arc::new(Repository::new(config.db_path.clone(), document));

    let admin = Arc::new(AdminAuth::new(
        config.admin_password.clone(),
        config.jwt_secret.clone(),
        config.admin_token_ttl_secs,
    ));
    if !admin.is_enabled() {
        tracing::warn!(
            "No admin password configured (GUESTBOOK_ADMIN_PASSWORD). Admin login is disabled!"
        );
    }

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(KakaoIdentity::new(config.kakao_api_base.clone()));

    // Create application state
    let state = AppState {
        repo,
        identity,
        admin,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Clone the token checker for the auth layer
    let admin = state.admin.clone();

    // Routes open to visitors
    let public_routes = Router::new()
        .route(
            "/comments",
            get(api::list_comments).post(api::create_comment),
        )
        .route("/logins", post(api::record_login))
        .route("/admin/login", post(api::admin_login));

    // Routes requiring an admin token
    let admin_routes = Router::new()
        .route("/comments/{id}", delete(api::delete_comment))
        .route("/admin/logins", get(api::list_logins))
        .route(
            "/admin/memos",
            get(api::list_memos).post(api::create_memo),
        )
        .route(
            "/admin/memos/{id}",
            get(api::get_memo)
                .put(api::update_memo)
                .delete(api::delete_memo),
        )
        // Apply admin auth middleware to matched routes only
        .route_layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .merge(health_routes);

    // Widget assets, with unknown paths falling back to the page itself
    if let Some(dir) = state.config.static_dir.clone() {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS configuration: pinned to the public domain when one is configured.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.allowed_origin() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid GUESTBOOK_DOMAIN {:?}; no cross-origin access", origin);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
