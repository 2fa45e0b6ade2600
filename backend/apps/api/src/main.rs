//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors. Request errors are rendered by the
//! identity crate as `kernel::error::AppError` problem documents.

use axum::{
    Router, http,
    http::{Method, header},
};
use identity::{
    FormatOnlyProbe, IdentityConfig, InMemoryUserStore, SharedClock, SmtpMailboxProbe,
    identity_router,
};
use mockable::DefaultClock;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,identity=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Identity configuration
    let identity_config = if cfg!(debug_assertions) && env::var("TOKEN_SECRET").is_err() {
        tracing::warn!("TOKEN_SECRET not set, using a random secret and no mail probe");
        IdentityConfig::development()
    } else {
        IdentityConfig::from_env()?
    };

    tracing::info!(
        mail_probe = identity_config.mail_probe.enabled,
        login_failure_policy = ?identity_config.login_failure_policy,
        request_timeout_secs = identity_config.request_timeout.as_secs(),
        "Identity configuration loaded"
    );

    let store = Arc::new(InMemoryUserStore::new(identity_config.password_pepper.clone()));
    let clock: SharedClock = Arc::new(DefaultClock);

    let identity = if identity_config.mail_probe.enabled {
        let probe = Arc::new(SmtpMailboxProbe::new(&identity_config.mail_probe));
        identity_router(store, probe, identity_config, clock)?
    } else {
        identity_router(store, Arc::new(FormatOnlyProbe), identity_config, clock)?
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/identity", identity)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
