//! MCP gateway exposing Trello as a catalog of validated tools.
//!
//! - [`trello`]: outbound REST client with credential binding
//! - [`mcp`]: argument validation, tool registry and both MCP transports
//! - [`gateway`]: authenticated HTTP front door
//! - [`cli`]: flag and environment configuration

pub mod cli;
pub mod gateway;
pub mod mcp;
pub mod trello;
