//! Station contract and registry
//!
//! A station knows how to list its programs and how to turn one program into
//! an ordered list of broadcasts. Concrete stations are registered in
//! [`StationKind`] so front ends can enumerate them without knowing the types.

mod kol_barama;
mod kol_hay;

pub use kol_barama::KolBaramaStation;
pub use kol_hay::KolHayStation;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Broadcast, ProgramRef, ProgressFn};
use async_trait::async_trait;

/// Capabilities every radio station provides
#[async_trait]
pub trait Station: Send + Sync {
    /// Human-readable station name
    fn name(&self) -> &'static str;

    /// Ordered program names offered by the station
    ///
    /// The list is loaded from the site once per station instance; later
    /// calls return the cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched, or
    /// [`Error::NotSupported`](crate::Error::NotSupported) for stations that
    /// are not implemented.
    async fn load_programs(&self) -> Result<Vec<String>>;

    /// Ordered broadcasts of one program
    ///
    /// `progress` receives `(completed, total)` page counts while the
    /// broadcast detail pages are fetched. A program the site cannot resolve
    /// yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a page fetch fails, or
    /// [`Error::Selection`](crate::Error::Selection) if an ordinal is out of
    /// range.
    async fn load_broadcasts(
        &self,
        program: &ProgramRef,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<Broadcast>>;
}

/// Registered station variants, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StationKind {
    /// Kol-Hay (93fm)
    KolHay,
    /// Kol-Barama (listed, not implemented)
    KolBarama,
}

impl StationKind {
    /// Every station, in the order shown to users
    pub const ALL: [StationKind; 2] = [StationKind::KolHay, StationKind::KolBarama];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            StationKind::KolHay => "Kol-Hay",
            StationKind::KolBarama => "Kol-Barama",
        }
    }

    /// Look a station up by its display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Instantiate the station with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or site layout cannot be built.
    pub fn build(self, config: &Config) -> Result<Box<dyn Station>> {
        Ok(match self {
            StationKind::KolHay => Box::new(KolHayStation::new(config)?),
            StationKind::KolBarama => Box::new(KolBaramaStation),
        })
    }
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
