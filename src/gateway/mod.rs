//! Gateway front door and HTTP server.
//!
//! Every request is authenticated against the shared secret before routing.
//! Authenticated `OPTIONS` requests get a CORS preflight answer; everything
//! else is routed to the duplex SSE transport, the single-shot `/mcp`
//! transport, the legacy `/sse` connectivity check, or 404.

mod auth;
mod cors;
mod routes;
mod state;


use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::trello::{DEFAULT_BASE_URL, HttpTrelloClient, TrelloCredentials, TrelloError};

pub use auth::constant_time_eq;
pub use routes::create_router;
pub use state::AppState;

/// Gateway server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Trello REST API base URL
    pub trello_base_url: String,
    pub credentials: TrelloCredentials,
    /// Secret callers must present; `None` rejects every request
    pub shared_secret: Option<String>,
    /// Per-call timeout for outbound Trello requests
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn new(credentials: TrelloCredentials) -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8787,
            trello_base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            shared_secret: None,
            request_timeout: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("trello_base_url", &self.trello_base_url)
            .field("credentials", &self.credentials)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum GatewayError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(code(trello_mcp::gateway::bind))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(trello_mcp::gateway::serve))]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Trello(#[from] TrelloError),
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trello_mcp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the gateway until Ctrl-C.
pub async fn run(config: Config) -> Result<(), GatewayError> {
    init_tracing();

    if config.shared_secret.is_none() {
        warn!("No shared secret configured, all requests will be rejected");
    }

    let client = HttpTrelloClient::new(
        config.trello_base_url,
        config.credentials,
        config.request_timeout,
    )?;
    let shutdown = CancellationToken::new();
    let state = AppState::new(Arc::new(client), config.shared_secret, shutdown.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind { addr, source })?;
    info!("Trello MCP gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(GatewayError::Serve)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    info!("Shutting down");
    shutdown.cancel();
}
