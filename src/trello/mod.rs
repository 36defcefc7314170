//! Remote Trello invocation.
//!
//! - `client`: the [`TrelloApi`] capability and its reqwest implementation
//! - `error`: opaque failure classification

mod client;
mod error;

#[cfg(test)]
mod client_test;

pub use client::{
    DEFAULT_BASE_URL, HttpTrelloClient, TrelloApi, TrelloCredentials, authenticated_url,
};
pub use error::{TrelloError, TrelloResult};

#[cfg(test)]
pub use client::MockTrelloApi;
