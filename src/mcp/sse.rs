//! Duplex SSE transport
//!
//! A client opens `GET /sse` and keeps the stream. The first event names the
//! endpoint where the client POSTs its JSON-RPC messages; every server
//! message for that session is then pushed down the stream as a `message`
//! event. The session lives exactly as long as the stream.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::Event;
use dashmap::DashMap;
use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use miette::Diagnostic;
use rmcp::ServerHandler;
use rmcp::ServiceExt;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Path clients POST session messages to.
pub const MESSAGE_PATH: &str = "/sse/message";

const CHANNEL_CAPACITY: usize = 64;

type SessionMap = DashMap<String, mpsc::Sender<ClientJsonRpcMessage>>;

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    #[diagnostic(code(trello_mcp::sse::not_found))]
    NotFound,

    #[error("Session closed")]
    #[diagnostic(code(trello_mcp::sse::closed))]
    Closed,
}

/// Live SSE sessions keyed by session id.
#[derive(Clone, Default)]
pub struct SseSessions {
    sessions: Arc<SessionMap>,
}

// Removes the session when the event stream is dropped
struct SessionGuard {
    session_id: String,
    sessions: Arc<SessionMap>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.session_id);
        info!(session_id = %self.session_id, "SSE session closed");
    }
}

impl SseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Register a new session served by `handler`.
    ///
    /// Returns the session id and the event stream for the client. The
    /// first event is `endpoint`; the rest are `message` events carrying
    /// the server's JSON-RPC output.
    pub fn open<S: ServerHandler>(
        &self,
        handler: S,
        ct: CancellationToken,
    ) -> (String, impl Stream<Item = Result<Event, Infallible>> + Send + 'static + use<S>) {
        let session_id = Uuid::new_v4().to_string();
        let (inbound_tx, inbound_rx) = mpsc::channel::<ClientJsonRpcMessage>(CHANNEL_CAPACITY);
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerJsonRpcMessage>(CHANNEL_CAPACITY);
        self.sessions.insert(session_id.clone(), inbound_tx);
        info!(%session_id, "SSE session opened");

        let id = session_id.clone();
        let shutdown = ct.clone();
        tokio::spawn(async move {
            match handler.serve_with_ct((outbound_tx, inbound_rx), ct).await {
                Ok(running) => {
                    if let Err(e) = running.waiting().await {
                        warn!(session_id = %id, error = %e, "SSE session task failed");
                    }
                }
                Err(e) => debug!(session_id = %id, error = %e, "SSE session ended before initialization"),
            }
        });

        let guard = SessionGuard {
            session_id: session_id.clone(),
            sessions: Arc::clone(&self.sessions),
        };
        let endpoint = Event::default()
            .event("endpoint")
            .data(format!("{MESSAGE_PATH}?sessionId={session_id}"));

        let stream = async_stream::stream! {
            let _guard = guard;
            yield Ok::<_, Infallible>(endpoint);

            loop {
                let message = tokio::select! {
                    _ = shutdown.cancelled() => break,
                    message = outbound_rx.next() => message,
                };
                let Some(message) = message else { break };
                match Event::default().event("message").json_data(&message) {
                    Ok(event) => yield Ok(event),
                    Err(e) => warn!(error = %e, "Dropping unserializable server message"),
                }
            }
        };

        (session_id, stream)
    }

    /// Hand one client message to its session.
    pub async fn deliver(
        &self,
        session_id: &str,
        message: ClientJsonRpcMessage,
    ) -> Result<(), SessionError> {
        // Clone the sender so the map shard is not held across the await
        let mut sender = self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::NotFound)?;
        sender.send(message).await.map_err(|_| SessionError::Closed)
    }
}
