//! Command-line and environment configuration for the gateway binary.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;

use crate::gateway::Config;
use crate::trello::{DEFAULT_BASE_URL, TrelloCredentials};

#[derive(Parser)]
#[command(name = "trello-mcp")]
#[command(author, version, about = "MCP gateway for the Trello REST API", long_about = None)]
pub struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8787")]
    pub port: u16,

    /// Trello API key
    #[arg(long, env = "TRELLO_API_KEY", hide_env_values = true)]
    pub trello_api_key: String,

    /// Trello API token
    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    pub trello_token: String,

    /// Secret callers must present as `?secret=` or `Authorization: Bearer`.
    /// Without it every request is rejected.
    #[arg(long, env = "SHARED_SECRET", hide_env_values = true)]
    pub shared_secret: Option<String>,

    /// Trello REST API base URL
    #[arg(long, env = "TRELLO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub trello_base_url: String,

    /// Timeout in seconds for each outbound Trello request (none by default)
    #[arg(long, env = "TRELLO_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            host: self.host,
            port: self.port,
            trello_base_url: self.trello_base_url,
            credentials: TrelloCredentials::new(self.trello_api_key, self.trello_token),
            shared_secret: self.shared_secret.filter(|secret| !secret.is_empty()),
            request_timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
