//! HTTP fetch capability
//!
//! Two shapes are offered:
//! - single-page fetches, optionally reporting byte progress while the body is
//!   accumulated in fixed-size chunks;
//! - concurrent multi-page batches bounded by a connection ceiling, returning
//!   bodies in input order and reporting `(completed, total)` once per page.
//!
//! Every batch gets its own client (and so its own connection pool), torn down
//! when the batch finishes.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::ProgressFn;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Counter state for one concurrent batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// Pages finished so far (success or failure)
    pub completed: u64,
    /// Pages in the batch
    pub total: u64,
}

/// Aggregates completions from concurrent fetches into `(completed, total)` calls
///
/// The callback runs while the counter lock is held, so observed `completed`
/// values are strictly increasing by one and end at `total`.
pub struct ProgressTracker<'a> {
    state: Mutex<ProgressState>,
    callback: Option<&'a ProgressFn>,
}

impl<'a> ProgressTracker<'a> {
    /// Create a tracker for a batch of `total` units
    pub fn new(total: u64, callback: Option<&'a ProgressFn>) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                completed: 0,
                total,
            }),
            callback,
        }
    }

    /// Record one completed unit and notify the callback
    pub fn increment(&self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.completed >= state.total {
            return;
        }
        state.completed += 1;
        if let Some(callback) = self.callback {
            callback(state.completed, state.total);
        }
    }

    /// Current counter snapshot
    pub fn snapshot(&self) -> ProgressState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Page and content fetcher
#[derive(Clone)]
pub struct HttpFetcher {
    config: FetchConfig,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = build_client(&config, None)?;
        Ok(Self { config, client })
    }

    /// Fetch settings this fetcher was built with
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Client for streamed transfers (connect timeout only, no total deadline)
    pub fn streaming_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.config.request_timeout)
            .user_agent(self.config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
    }

    /// Fetch the full content of one page
    pub async fn fetch_page(&self, url: &str) -> Result<Vec<u8>> {
        fetch_with(&self.client, url).await
    }

    /// Fetch one page, reporting `(bytes_so_far, total)` after every chunk
    ///
    /// `total` is the advertised content length, else `expected_size`, else 0.
    /// A final `(size, size)` call is always made on success so sinks can show
    /// completion even when no length was known up front.
    pub async fn fetch_page_with_progress(
        &self,
        url: &str,
        expected_size: Option<u64>,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<u8>> {
        let Some(progress) = progress else {
            return self.fetch_page(url).await;
        };

        let mut response = send_checked(&self.client, url).await?;
        let total = response.content_length().or(expected_size).unwrap_or(0);
        let mut content = Vec::with_capacity(total.min(16 * 1024 * 1024) as usize);

        while let Some(chunk) = response.chunk().await? {
            for piece in chunk.chunks(self.config.chunk_size.max(1)) {
                content.extend_from_slice(piece);
                progress(content.len() as u64, total);
            }
        }

        let size = content.len() as u64;
        progress(size, size);
        Ok(content)
    }

    /// Fetch all `urls` concurrently, failing the batch on the first error
    ///
    /// Results are in input order. At most `connections` requests are in flight.
    pub async fn fetch_pages(
        &self,
        urls: &[String],
        connections: usize,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<Vec<u8>>> {
        let client = build_client(&self.config, Some(connections))?;
        let tracker = ProgressTracker::new(urls.len() as u64, progress);

        let pages = stream::iter(urls.iter().cloned())
            .map(|url| {
                let (client, tracker) = (&client, &tracker);
                async move { fetch_tracked(client, &url, tracker).await }
            })
            .buffered(connections.max(1))
            .try_collect::<Vec<_>>()
            .await?;

        info!(pages = tracker.snapshot().completed, "Fetched page batch");
        Ok(pages)
    }

    /// Fetch all `urls` concurrently, keeping one result per URL
    ///
    /// Results are in input order; a failed page does not affect the others.
    pub async fn fetch_pages_settled(
        &self,
        urls: &[String],
        connections: usize,
        progress: Option<&ProgressFn>,
    ) -> Vec<Result<Vec<u8>>> {
        let client = match build_client(&self.config, Some(connections)) {
            Ok(client) => client,
            Err(e) => {
                let reason = e.to_string();
                return urls.iter().map(|_| Err(Error::Other(reason.clone()))).collect();
            }
        };
        let tracker = ProgressTracker::new(urls.len() as u64, progress);

        let results: Vec<Result<Vec<u8>>> = stream::iter(urls.iter().cloned())
            .map(|url| {
                let (client, tracker) = (&client, &tracker);
                async move { fetch_tracked(client, &url, tracker).await }
            })
            .buffered(connections.max(1))
            .collect()
            .await;

        let pages = tracker.snapshot().completed;
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(pages, failed, "Page batch finished with failures");
        } else {
            info!(pages, "Fetched page batch");
        }
        results
    }
}

fn build_client(config: &FetchConfig, connections: Option<usize>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone());
    if let Some(connections) = connections {
        builder = builder.pool_max_idle_per_host(connections);
    }
    builder
        .build()
        .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
}

/// Send a GET and reject non-success statuses
pub(crate) async fn send_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    debug!(url = %url, "GET");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn fetch_with(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = send_checked(client, url).await?;
    Ok(response.bytes().await?.to_vec())
}

async fn fetch_tracked(
    client: &reqwest::Client,
    url: &str,
    tracker: &ProgressTracker<'_>,
) -> Result<Vec<u8>> {
    let result = fetch_with(client, url).await;
    if let Err(e) = &result {
        debug!(url = %url, error = %e, "Page fetch failed");
    }
    tracker.increment();
    result
}
