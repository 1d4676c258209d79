//! Redemption Renovations site backend
//!
//! JSON API for the projects gallery, the blog and the admin panel, with SQLite
//! persistence and stateless bearer-token authentication.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    middleware,
    routing::{any, get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{Claims, CredentialStore, TokenService};
use config::Config;
use db::Repository;
use errors::{AppError, ErrorReply};

/// Prefixes the API is reachable under. The second keeps the existing front end working.
const ROUTE_PREFIXES: &[&str] = &["/api", "/.netlify/functions"];

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured
    pub repo: Option<Arc<Repository>>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, repo: Option<Repository>) -> Self {
        Self {
            repo: repo.map(Arc::new),
            credentials: Arc::new(CredentialStore::new(
                config.admin_emails.clone(),
                config.admin_passwords.clone(),
            )),
            tokens: Arc::new(TokenService::new(&config.jwt_secret)),
            config: Arc::new(config),
        }
    }

    /// The repository, or a 503 when the deployment has no database.
    pub fn repo(&self) -> Result<&Repository, AppError> {
        self.repo.as_deref().ok_or_else(|| {
            AppError::NotConfigured(
                "Database not configured. Please set DATABASE_URL environment variable."
                    .to_string(),
            )
        })
    }

    /// Require a valid admin bearer token.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AppError> {
        let token = auth::bearer_token(headers)?;
        Ok(self.tokens.verify(token)?)
    }

    /// Claims of the caller if they presented a valid token; anonymous otherwise.
    pub fn viewer(&self, headers: &HeaderMap) -> Option<Claims> {
        self.authorize(headers).ok()
    }

    /// Wrap an error raised on an admin-only path. Internal detail is shown
    /// outside production.
    pub fn admin_error(&self, error: AppError) -> ErrorReply {
        ErrorReply {
            error,
            expose_detail: !self.config.is_production(),
        }
    }
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

    tracing::info!("Starting Redemption Renovations backend");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set; tokens are signed with the development secret!");
    }
    if config.admin_emails.len() != config.admin_passwords.len() {
        tracing::error!(
            "ADMIN_EMAILS has {} entries but ADMIN_PASSWORDS has {}; logins will fail",
            config.admin_emails.len(),
            config.admin_passwords.len()
        );
    }

    // Initialize database
    let repo = match &config.database_url {
        Some(url) => {
            let pool = db::init_database(url).await?;
            let repo = Repository::new(pool, config.client_id);
            tracing::info!("Database ready (client id {})", repo.client_id());
            Some(repo)
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not configured; listings will be empty and writes rejected"
            );
            None
        }
    };

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, repo);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    let api_routes = Router::new()
        // Session
        .route(
            "/auth",
            post(api::login).fallback(api::method_not_allowed),
        )
        .route(
            "/verify",
            get(api::verify).fallback(api::method_not_allowed),
        )
        // Projects
        .route(
            "/projects",
            get(api::list_projects)
                .post(api::create_project)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/projects/{id}",
            get(api::get_project)
                .put(api::update_project)
                .delete(api::delete_project)
                .fallback(api::method_not_allowed),
        )
        // Blog
        .route(
            "/blog",
            get(api::list_posts)
                .post(api::create_post)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/blog/{id}",
            get(api::get_post)
                .put(api::update_post)
                .delete(api::delete_post)
                .fallback(api::method_not_allowed),
        )
        // Retired
        .route("/cars", any(api::retired_cars));

    let mut router = Router::new().route("/health", get(health_check));
    for prefix in ROUTE_PREFIXES {
        router = router.nest(prefix, api_routes.clone());
    }

    router
        .fallback(api::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(api::cors_headers))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    projects: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blog_posts: Option<i64>,
}

/// Health check endpoint. Row counts are reported while the database answers.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let Some(repo) = &state.repo else {
        return Json(HealthResponse {
            status: "ok",
            database: "not_configured",
            ..Default::default()
        });
    };

    match row_counts(repo).await {
        Ok((projects, blog_posts)) => Json(HealthResponse {
            status: "ok",
            database: "connected",
            projects: Some(projects),
            blog_posts: Some(blog_posts),
        }),
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            Json(HealthResponse {
                status: "ok",
                database: "unavailable",
                ..Default::default()
            })
        }
    }
}

async fn row_counts(repo: &Repository) -> Result<(i64, i64), AppError> {
    Ok((repo.count_projects().await?, repo.count_blog_posts().await?))
}

#[cfg(test)]
mod tests;
