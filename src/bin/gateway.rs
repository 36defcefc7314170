//! Trello MCP gateway binary.
//!
//! Parses configuration from flags and environment, installs the TLS
//! crypto provider used by the outbound Trello client, and runs the server.

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use trello_mcp::cli::Cli;
use trello_mcp::gateway::{self, GatewayError};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Failed to install TLS crypto provider")]
    #[diagnostic(code(trello_mcp::binary::crypto))]
    CryptoProvider,

    #[error("Gateway error: {0}")]
    #[diagnostic(code(trello_mcp::binary::gateway))]
    Gateway(#[from] GatewayError),
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let config = Cli::parse().into_config();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| BinaryError::CryptoProvider)?;

    gateway::run(config).await?;

    Ok(())
}
