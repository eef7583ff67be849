//! # radio-dl
//!
//! Library for listing and downloading radio broadcast archives.
//!
//! ## Overview
//!
//! A [`Station`] lists its programs and turns a program into an ordered list of
//! [`Broadcast`]s by crawling the station's web site:
//!
//! - the [`crawler`] resolves a program name to its canonical listing pages and
//!   collects detail-page links in page order;
//! - the [`extractor`] turns each detail page into named audio links;
//! - the [`scheduler`] downloads the chosen broadcasts with bounded
//!   parallelism, one file per broadcast.
//!
//! All page fetches go through [`HttpFetcher`], which preserves input order for
//! concurrent batches and reports `(completed, total)` progress.
//!
//! ## Quick Start
//!
//! ```no_run
//! use radio_dl::{Config, DownloadScheduler, HttpFetcher, ProgramRef, StationKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let station = StationKind::KolHay.build(&config)?;
//!
//!     let programs = station.load_programs().await?;
//!     println!("{} programs", programs.len());
//!
//!     let broadcasts = station
//!         .load_broadcasts(&ProgramRef::Index(0), None)
//!         .await?;
//!
//!     let fetcher = HttpFetcher::new(config.fetch.clone())?;
//!     let report = DownloadScheduler::new(&fetcher, config.download.file_collision)?
//!         .download_many(&broadcasts, config.output_dir(), 4, 1)
//!         .await?;
//!     println!("{} downloaded", report.succeeded().count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Program page crawler
pub mod crawler;
/// Error types
pub mod error;
/// Broadcast extraction from detail pages
pub mod extractor;
/// HTML node extraction
pub mod html;
/// HTTP fetch capability
pub mod http;
/// Bounded-concurrency download scheduler
pub mod scheduler;
/// Station contract and registry
pub mod station;
/// Core types
pub mod types;
/// Helper functions for file naming and paths
pub mod utils;

pub use config::{
    Config, DownloadConfig, FetchConfig, FileCollisionAction, PartialFailurePolicy, SiteConfig,
};
pub use crawler::{ProgramCrawler, ProgramRoot, SiteLayout};
pub use error::{DownloadError, Error, Result};
pub use extractor::BroadcastExtractor;
pub use http::{HttpFetcher, ProgressTracker};
pub use scheduler::{
    DownloadJob, DownloadObserver, DownloadOutcome, DownloadReport, DownloadScheduler,
    NoopObserver,
};
pub use station::{KolBaramaStation, KolHayStation, Station, StationKind};
pub use types::{Broadcast, ProgramRef, ProgressFn, Selection};
