//! HTTP client for the Trello REST API.
//!
//! [`TrelloApi`] is the single capability tool handlers get. The production
//! implementation, [`HttpTrelloClient`], appends the account credentials to
//! every request and performs exactly one HTTP call per invocation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::error::{TrelloError, TrelloResult};

/// Default public endpoint of the Trello REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Long-lived Trello credentials sent with every request.
#[derive(Clone)]
pub struct TrelloCredentials {
    api_key: String,
    token: String,
}

impl TrelloCredentials {
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for TrelloCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloCredentials")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Remote invocation capability.
///
/// `path` is a resource path relative to the API root, optionally with a
/// query string, and never carries credentials. On success the parsed JSON
/// body is returned as-is, keys in the order the remote sent them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrelloApi: Send + Sync {
    async fn invoke(&self, method: Method, path: &str, body: Option<Value>)
    -> TrelloResult<Value>;
}

/// Build the full request URL for `path`, with `key` and `token` appended.
///
/// The credentials are joined with `&` when `path` already has a query
/// string and with `?` otherwise.
pub fn authenticated_url(
    base_url: &str,
    path: &str,
    credentials: &TrelloCredentials,
) -> TrelloResult<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| TrelloError::InvalidUrl {
        message: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("key", &credentials.api_key)
        .append_pair("token", &credentials.token);
    Ok(url)
}

/// [`TrelloApi`] over HTTPS using reqwest.
#[derive(Clone)]
pub struct HttpTrelloClient {
    base_url: String,
    credentials: TrelloCredentials,
    client: Client,
}

impl HttpTrelloClient {
    /// Create a client bound to `base_url` and `credentials`.
    ///
    /// With a `timeout`, every request gets its own deadline; one slow call
    /// never affects another.
    pub fn new(
        base_url: impl Into<String>,
        credentials: TrelloCredentials,
        timeout: Option<Duration>,
    ) -> TrelloResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: base_url.into(),
            credentials,
            client,
        })
    }
}

impl fmt::Debug for HttpTrelloClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTrelloClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[async_trait]
impl TrelloApi for HttpTrelloClient {
    async fn invoke(&self, method: Method, path: &str, body: Option<Value>) -> TrelloResult<Value> {
        let url = authenticated_url(&self.base_url, path, &self.credentials)?;

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(%method, path, timeout = e.is_timeout(), "Trello request did not complete");
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%method, path, status = status.as_u16(), "Trello request rejected");
            return Err(TrelloError::Status {
                status: status.as_u16(),
            });
        }

        debug!(%method, path, status = status.as_u16(), "Trello request succeeded");
        response.json::<Value>().await.map_err(|_| TrelloError::Decode)
    }
}
