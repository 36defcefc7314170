//! Shared state for the gateway router.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::mcp::SseSessions;
use crate::trello::TrelloApi;

/// Shared application state.
///
/// Generic over `C: TrelloApi` so router tests can run against a fake
/// client. The secret is fixed at startup and never mutated.
pub struct AppState<C: TrelloApi> {
    client: Arc<C>,
    sessions: SseSessions,
    shared_secret: Option<Arc<str>>,
    shutdown: CancellationToken,
}

// Manual Clone impl - C itself need not be Clone
impl<C: TrelloApi> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            sessions: self.sessions.clone(),
            shared_secret: self.shared_secret.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<C: TrelloApi> AppState<C> {
    pub fn new(client: Arc<C>, shared_secret: Option<String>, shutdown: CancellationToken) -> Self {
        Self {
            client,
            sessions: SseSessions::new(),
            shared_secret: shared_secret.map(Arc::from),
            shutdown,
        }
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    pub fn sessions(&self) -> &SseSessions {
        &self.sessions
    }

    pub fn shared_secret(&self) -> Option<Arc<str>> {
        self.shared_secret.clone()
    }

    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}
