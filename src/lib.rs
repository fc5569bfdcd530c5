//! Role-based access control demo: session-scoped TODO lists behind an axum
//! router whose routes are named after the permissions they require.

pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod rbac;
pub mod route;
pub mod schema;
pub mod shell;
pub mod store;

use std::{path::Path, sync::Arc};

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::Config;
pub use error::{AppError, AppResult};
use rbac::{Rbac, RoleFetcher, SessionPresence};
use store::{SessionStore, UserStore};

// Struct representing the application state
pub struct AppState {
    pub users: UserStore,
    pub sessions: SessionStore,
    pub rbac: Rbac,
    pub roles: Arc<dyn RoleFetcher>,
}

impl AppState {
    pub fn new(rbac: Rbac) -> Self {
        Self::with_role_fetcher(rbac, Arc::new(SessionPresence))
    }

    pub fn with_role_fetcher(rbac: Rbac, roles: Arc<dyn RoleFetcher>) -> Self {
        AppState {
            users: UserStore::new(),
            sessions: SessionStore::new(),
            rbac,
            roles,
        }
    }
}

/// API routes plus the static frontend bundle for everything they don't match.
pub fn create_app(
    app_state: Arc<AppState>,
    static_dir: impl AsRef<Path>,
    cors_origin: &str,
) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE]);
    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => tracing::warn!("ignoring invalid CORS origin {:?}", cors_origin),
    }

    route::create_router(app_state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "axum_rbac_todo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
