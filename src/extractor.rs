//! Broadcast extraction from detail pages
//!
//! A detail page has one title and zero or more audio links. One link yields a
//! broadcast named after the title; several links yield `"{title} - 1"`,
//! `"{title} - 2"`, ... in document order, numbering restarting on every page.

use crate::error::Result;
use crate::html::{self, parse_document, select_nodes};
use crate::types::Broadcast;
use scraper::Selector;
use tracing::{debug, warn};
use url::Url;

/// Title selector on Kol-Hay broadcast pages
pub const KOL_HAY_TITLE: &str = "main.main.program > h1";

/// Audio link selector on Kol-Hay broadcast pages
pub const KOL_HAY_AUDIO: &str = "div.player-position > audio > a";

/// Extracts `(name, url)` pairs from broadcast detail pages
#[derive(Clone, Debug)]
pub struct BroadcastExtractor {
    title: Selector,
    audio: Selector,
}

impl BroadcastExtractor {
    /// Create an extractor from title and audio-link CSS selectors
    pub fn new(title_css: &str, audio_css: &str) -> Result<Self> {
        Ok(Self {
            title: html::selector(title_css)?,
            audio: html::selector(audio_css)?,
        })
    }

    /// Extractor for the Kol-Hay page layout
    pub fn kol_hay() -> Result<Self> {
        Self::new(KOL_HAY_TITLE, KOL_HAY_AUDIO)
    }

    /// Extract the broadcasts of one detail page
    ///
    /// Pages without audio links yield nothing. A page with audio links but no
    /// title is skipped with a warning, since its broadcasts cannot be named.
    pub fn extract(&self, page: &[u8], page_url: Option<&Url>) -> Vec<Broadcast> {
        let document = parse_document(page);
        let files: Vec<String> = select_nodes(&document, &self.audio, page_url)
            .into_iter()
            .filter_map(|node| node.href)
            .collect();
        if files.is_empty() {
            debug!(page = ?page_url.map(Url::as_str), "No audio links on page");
            return Vec::new();
        }

        let Some(title) = select_nodes(&document, &self.title, page_url).into_iter().next() else {
            warn!(
                page = ?page_url.map(Url::as_str),
                files = files.len(),
                "Page has audio links but no title; skipping"
            );
            return Vec::new();
        };

        name_tracks(&title.text, files)
    }

    /// Extract broadcasts from many pages, concatenated in page order
    pub fn extract_all<'a, I>(&self, pages: I) -> Vec<Broadcast>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        pages
            .into_iter()
            .flat_map(|(url, page)| {
                let base = Url::parse(url).ok();
                self.extract(page, base.as_ref())
            })
            .collect()
    }
}

/// Apply the per-page numbering policy
fn name_tracks(title: &str, files: Vec<String>) -> Vec<Broadcast> {
    if files.len() == 1 {
        return files
            .into_iter()
            .map(|url| Broadcast::new(title, url))
            .collect();
    }

    files
        .into_iter()
        .enumerate()
        .map(|(i, url)| Broadcast::new(format!("{} - {}", title, i + 1), url))
        .collect()
}
