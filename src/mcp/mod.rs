//! Model Context Protocol (MCP) server implementation
//!
//! Exposes the Trello tool catalog over two transports that share one
//! request pipeline:
//!
//! - **sse**: duplex session, events pushed over a long-lived `GET /sse`
//!   stream, client messages POSTed to `/sse/message`
//! - **service**: single-shot Streamable HTTP at `/mcp`
//!
//! Both hand requests to [`TrelloServer`], which validates arguments via
//! the **validation** module and dispatches through the **tools** registry.

pub mod error;
pub mod server;
mod service;
pub mod sse;
pub mod tools;
pub mod validation;

#[cfg(test)]
mod service_test;
#[cfg(test)]
mod validation_test;

pub use error::ToolError;
pub use server::TrelloServer;
pub use service::create_mcp_service;
pub use sse::{MESSAGE_PATH, SessionError, SseSessions};
