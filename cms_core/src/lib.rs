//! Core library containing business logic and route handlers for the file CMS.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod render;
pub mod session;
pub mod store;
pub mod validation;

pub use auth::{CredentialVerifier, FixedCredentials};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use render::render_markdown;
pub use session::{Session, SessionClaims, SessionCodec};
pub use store::{DocumentKind, DocumentStore};
pub use validation::{validate_filename, FilenameError};

use axum::Router;
use http::{Request, Response};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub store: DocumentStore,
    pub session_codec: SessionCodec,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            app_name: "File CMS".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: DocumentStore::new(&config.store.root),
            session_codec: SessionCodec::new(
                &config.session.secret,
                config.session.cookie_name.clone(),
            )?,
            credentials: Arc::new(FixedCredentials::from_config(&config.auth)),
        })
    }

    /// Swaps in a different credential backend. Tests use this to avoid
    /// depending on the configured admin account.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        let latency_ms = latency.as_millis();

                        if status.is_server_error() {
                            tracing::error!(
                                status = status.as_u16(),
                                latency_ms = latency_ms,
                                "request failed"
                            );
                        } else if status.is_client_error() {
                            tracing::warn!(
                                status = status.as_u16(),
                                latency_ms = latency_ms,
                                "client error response"
                            );
                        } else {
                            tracing::info!(
                                status = status.as_u16(),
                                latency_ms = latency_ms,
                                "request completed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
