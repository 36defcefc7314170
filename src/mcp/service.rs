//! MCP Streamable HTTP service creation
//!
//! Builds the single-shot `/mcp` endpoint: every POST carries one JSON-RPC
//! message and gets its response in the same HTTP exchange.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use super::server::TrelloServer;
use crate::trello::TrelloApi;

/// Create the stateless Streamable HTTP service for `/mcp`.
///
/// A fresh [`TrelloServer`] is built for each request; all of them share
/// `client`. No session is kept between requests and no keep-alive events
/// are sent.
///
/// # Arguments
/// * `client` - Trello capability the tools call
/// * `cancellation_token` - Cancelled on shutdown to end in-flight requests
///
/// # Returns
/// A tower service to mount at the exact `/mcp` path
pub fn create_mcp_service<C: TrelloApi + 'static>(
    client: Arc<C>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<TrelloServer<C>, LocalSessionManager> {
    // rmcp expects io::Error from the factory
    let service_factory = move || -> Result<TrelloServer<C>, std::io::Error> {
        Ok(TrelloServer::new(Arc::clone(&client)))
    };

    let mut config = StreamableHttpServerConfig::default();
    config.sse_keep_alive = None;
    config.sse_retry = None;
    config.stateful_mode = false;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
