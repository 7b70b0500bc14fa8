//! Shared HTTP client for the staging API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use stagehand_util::errors::StagehandError;

/// Opening a staging repository can take several minutes server-side.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(600);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

const USER_AGENT: &str = concat!("stagehand/", env!("CARGO_PKG_VERSION"));

/// Build the reqwest client shared by every staging call.
///
/// The connection pool is reused across calls; the client itself holds no
/// per-repository state.
pub fn build_client() -> miette::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| {
            StagehandError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}
