//! HTTP front end for BestIP
//!
//! Serves three kinds of responses from the dataset store:
//! - `/bestipv4` - plain-text IPv4 address list
//! - `/bestipv6` - plain-text IPv6 address list
//! - any other path - HTML dashboard with classification and region columns
//!
//! A panic while handling a request is answered with a 500 carrying the
//! panic message.
//!
//! Every response, errors included, carries the `X-BestIP-Original` service
//! header. Nothing is cached between requests: each one reads the store and
//! parses the blobs again.
//!
//! # Examples
//!
//! ```no_run
//! use bestip_server::{serve, AppState, ServerConfig};
//! use bestip_store::FileStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let store = Arc::new(FileStore::new(&config.data_dir));
//! let state = AppState::new(store, config)?;
//! serve(state).await?;
//! # Ok(())
//! # }
//! ```

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Router};
use bestip_store::KvStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;

pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;

pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;

/// Name of the service identification header
pub const SERVICE_HEADER: &str = "x-bestip-original";

/// Shared request state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub config: Arc<ServerConfig>,
    service_header: HeaderValue,
}

impl AppState {
    /// Bundle a store and configuration
    ///
    /// Fails when the configured header value is not a valid HTTP header.
    pub fn new(store: Arc<dyn KvStore>, config: ServerConfig) -> config::Result<Self> {
        let service_header = HeaderValue::from_str(&config.service_header)
            .map_err(|_| ConfigError::InvalidHeader(config.service_header.clone()))?;

        Ok(Self {
            store,
            config: Arc::new(config),
            service_header,
        })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bestipv4", get(handlers::best_ipv4))
        .route("/bestipv6", get(handlers::best_ipv6))
        .fallback(handlers::dashboard)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::map_response_with_state(
            state.clone(),
            add_service_header,
        ))
        .with_state(state)
}

/// Stamp the service header onto a response
pub async fn add_service_header(State(state): State<AppState>, mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(SERVICE_HEADER, state.service_header.clone());
    response
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(state.config.bind).await?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C
pub async fn serve_on(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("BestIP listening on http://{}/", addr);
    tracing::info!("  - IPv4 list: http://{}/bestipv4", addr);
    tracing::info!("  - IPv6 list: http://{}/bestipv6", addr);
    tracing::info!(strict = state.config.strict, "  - Dashboard: http://{}/", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestip_store::MemoryStore;

    #[tokio::test]
    async fn test_service_header_added() {
        let state = AppState::new(Arc::new(MemoryStore::new()), ServerConfig::default()).unwrap();
        let response = add_service_header(State(state), Response::new(axum::body::Body::empty())).await;

        let value = response.headers()[SERVICE_HEADER].to_str().unwrap();
        assert!(value.starts_with("CloudFlare-BestIP-v"));
    }

    #[test]
    fn test_invalid_service_header_rejected() {
        let config = ServerConfig {
            service_header: "bad\nvalue".to_string(),
            ..ServerConfig::default()
        };
        let err = AppState::new(Arc::new(MemoryStore::new()), config).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidHeader(_)));
    }

    #[test]
    fn test_router_builds() {
        let state = AppState::new(Arc::new(MemoryStore::new()), ServerConfig::default()).unwrap();
        let _router = router(state);
    }
}
