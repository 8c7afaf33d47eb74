mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// Fetches `url` with a single GET. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed = url.parse::<reqwest::Url>().map_err(|e| PipelineError::InvalidSource {
        url: url.to_string(),
        reason: format!("{e}"),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let network = |source: reqwest::Error| PipelineError::Network {
        url: url.to_string(),
        source,
    };

    let fetch_start = Instant::now();
    let resp = client
        .execute(req)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(network)?;
    let bytes = resp.bytes().await.map_err(network)?;

    let elapsed = fetch_start.elapsed();
    if elapsed.as_secs() > 15 {
        warn!(elapsed_secs = elapsed.as_secs(), "Feed fetch was slow");
    }
    debug!(bytes = bytes.len(), "Feed bytes received");

    Ok(bytes.to_vec())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await
    } else {
        tokio::fs::read(source)
            .await
            .map_err(|e| PipelineError::io(source, e))
    }
}
