//! Bounded-concurrency download scheduler
//!
//! Downloads a list of broadcasts into a directory with at most `parallelism`
//! transfers in flight. The coordinator acquires a semaphore permit before
//! spawning each transfer, so a full window blocks admission until any one
//! running transfer finishes. Transfers own their permit and release it when
//! they end, successfully or not; they never touch the window themselves.

use crate::config::FileCollisionAction;
use crate::error::{DownloadError, Error, Result};
use crate::http::{HttpFetcher, send_checked};
use crate::types::Broadcast;
use crate::utils::{ensure_directory, get_unique_path, output_file_name};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One scheduled transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadJob {
    /// Zero-based position in the input list
    pub position: usize,
    /// Display index (position + start index), also used in the file name
    pub index: usize,
    /// The broadcast being downloaded
    pub broadcast: Broadcast,
    /// Destination file
    pub path: PathBuf,
}

/// Receives per-file lifecycle and byte-progress notifications
///
/// Called from transfer tasks; implementations must be cheap and thread-safe.
pub trait DownloadObserver: Send + Sync {
    /// A transfer took a slot in the window
    fn started(&self, _job: &DownloadJob) {}

    /// `written` bytes are on disk out of `total` (0 = unknown until the final call)
    fn progress(&self, _job: &DownloadJob, _written: u64, _total: u64) {}

    /// A transfer ended; `Ok` carries the number of bytes written
    fn finished(&self, _job: &DownloadJob, _result: &Result<u64>) {}
}

/// Observer that ignores every notification
pub struct NoopObserver;

impl DownloadObserver for NoopObserver {}

/// Result of one transfer
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The job that ran
    pub job: DownloadJob,
    /// Bytes written, or why the transfer failed
    pub result: Result<u64>,
}

/// Per-file outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// One entry per input broadcast
    pub outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    /// Transfers that completed
    pub fn succeeded(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    /// Transfers that failed
    pub fn failed(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Whether every transfer completed
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Streams broadcasts to disk, `parallelism` at a time
#[derive(Clone)]
pub struct DownloadScheduler {
    client: reqwest::Client,
    chunk_size: usize,
    file_collision: FileCollisionAction,
    observer: Arc<dyn DownloadObserver>,
}

impl DownloadScheduler {
    /// Create a scheduler using the fetcher's settings
    ///
    /// # Errors
    /// Returns error if the streaming HTTP client cannot be created
    pub fn new(fetcher: &HttpFetcher, file_collision: FileCollisionAction) -> Result<Self> {
        Ok(Self {
            client: fetcher.streaming_client()?,
            chunk_size: fetcher.config().chunk_size.max(1),
            file_collision,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Replace the observer receiving per-file notifications
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DownloadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Download every broadcast into `dest_dir`
    ///
    /// File names are `"{position + start_index:03} - {name}{ext}"`. A failed
    /// transfer is reported in the returned [`DownloadReport`] and frees its
    /// slot; it does not stop the others.
    ///
    /// # Errors
    /// Returns error if `parallelism` is 0, `dest_dir` is not a directory, or a
    /// transfer task panics.
    pub async fn download_many(
        &self,
        broadcasts: &[Broadcast],
        dest_dir: &Path,
        parallelism: usize,
        start_index: usize,
    ) -> Result<DownloadReport> {
        if parallelism == 0 {
            return Err(Error::config(
                "parallel_downloads",
                "'parallel_downloads' must be at least 1",
            ));
        }
        ensure_directory(dest_dir)?;

        let window = Arc::new(Semaphore::new(parallelism));
        let mut tasks: JoinSet<DownloadOutcome> = JoinSet::new();
        let mut outcomes = Vec::with_capacity(broadcasts.len());

        info!(
            count = broadcasts.len(),
            parallelism,
            dest = %dest_dir.display(),
            "Starting downloads"
        );

        for (position, broadcast) in broadcasts.iter().enumerate() {
            let index = position + start_index;
            let file_name = output_file_name(index, &broadcast.name, &broadcast.url);
            let mut job = DownloadJob {
                position,
                index,
                broadcast: broadcast.clone(),
                path: dest_dir.join(&file_name),
            };

            match get_unique_path(&job.path, self.file_collision) {
                Ok(path) => job.path = path,
                Err(e) => {
                    warn!(index, path = %job.path.display(), "Skipping existing file");
                    outcomes.push(DownloadOutcome { job, result: Err(e) });
                    continue;
                }
            }

            // Blocks while the window is full
            let permit = window
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::Other(format!("download window closed: {}", e)))?;

            let client = self.client.clone();
            let observer = Arc::clone(&self.observer);
            let chunk_size = self.chunk_size;

            tasks.spawn(async move {
                let _permit = permit;
                observer.started(&job);

                let result = download_file(&client, &job.broadcast.url, &job.path, chunk_size, |written, total| {
                    observer.progress(&job, written, total)
                })
                .await
                .map_err(|e| {
                    Error::Download(DownloadError::Failed {
                        index: job.index,
                        url: job.broadcast.url.clone(),
                        reason: e.to_string(),
                    })
                });

                match &result {
                    Ok(bytes) => info!(index = job.index, bytes, name = %job.broadcast.name, "Downloaded"),
                    Err(e) => warn!(index = job.index, error = %e, "Download failed"),
                }
                observer.finished(&job, &result);

                DownloadOutcome { job, result }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined?);
        }
        outcomes.sort_by_key(|o| o.job.position);

        let report = DownloadReport { outcomes };
        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "Downloads finished"
        );
        Ok(report)
    }
}

/// Stream `url` into `dest`, reporting `(written, total)` after every chunk
///
/// `total` is the response's content length, 0 if absent. A final call is made
/// with the real byte count as the total when the length was unknown, so the
/// last report always reads complete.
///
/// `dest` is only opened once the server has answered with a success status,
/// so a failed request leaves an existing file untouched. A file that was
/// opened and then failed mid-transfer is removed.
pub async fn download_file<F>(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    chunk_size: usize,
    progress: F,
) -> Result<u64>
where
    F: Fn(u64, u64),
{
    let response = send_checked(client, url).await?;
    let mut file = tokio::fs::File::create(dest).await?;

    let result = write_body(response, &mut file, chunk_size, &progress).await;
    if result.is_err() {
        drop(file);
        if tokio::fs::remove_file(dest).await.is_ok() {
            debug!(path = %dest.display(), "Removed partial download");
        }
    }
    result
}

async fn write_body<F>(
    mut response: reqwest::Response,
    file: &mut tokio::fs::File,
    chunk_size: usize,
    progress: &F,
) -> Result<u64>
where
    F: Fn(u64, u64),
{
    let total = response.content_length().unwrap_or(0);
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        for piece in chunk.chunks(chunk_size.max(1)) {
            file.write_all(piece).await?;
            written += piece.len() as u64;
            progress(written, total);
        }
    }
    file.flush().await?;

    if total == 0 {
        progress(written, written);
    }
    Ok(written)
}
