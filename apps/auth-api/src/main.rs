//! Orvia auth service.
//!
//! Bearer session tokens, verification codes, two-factor login, and
//! password reset over Postgres, served with Axum.

mod config;
mod logging;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::Config;
use orvia_api_auth::services::{
    HttpSettingsClient, SessionService, SettingsClient, StaticSettingsClient,
    VerificationService,
};
use orvia_api_auth::{auth_router, AuthState};
use orvia_auth::{ClientKeySigner, PasswordHasher};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    let pool = match orvia_db::connect(&config.database_url, config.max_db_connections).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let hasher = match PasswordHasher::new(config.hash_cost) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Invalid password hashing parameters: {e}");
            std::process::exit(1);
        }
    };
    let signer = match ClientKeySigner::new(config.client_encryption_secret.as_bytes().to_vec()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Invalid client encryption secret: {e}");
            std::process::exit(1);
        }
    };

    let settings: Arc<dyn SettingsClient> = match &config.settings_base_url {
        Some(base_url) => Arc::new(HttpSettingsClient::new(base_url.clone())),
        None => {
            info!("SETTINGS_BASE_URL not set, two factor login disabled");
            Arc::new(StaticSettingsClient::new(false))
        }
    };

    let verification_service = Arc::new(VerificationService::new(pool.clone()));
    let session_service = Arc::new(SessionService::new(
        pool,
        hasher,
        signer,
        settings,
        verification_service.clone(),
    ));

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth_router(AuthState::new(
            session_service,
            verification_service,
        )))
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };
    info!(addr = %config.listen_addr, "auth service listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
    info!("Server shutdown complete");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
