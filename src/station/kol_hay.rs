use super::Station;
use crate::config::Config;
use crate::crawler::{ProgramCrawler, SiteLayout};
use crate::error::{Error, Result};
use crate::extractor::BroadcastExtractor;
use crate::http::HttpFetcher;
use crate::types::{Broadcast, ProgramRef, ProgressFn};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Kol-Hay (93fm) station
///
/// The program catalog is fetched on first use and cached for the lifetime of
/// the instance, even when several callers race to load it.
pub struct KolHayStation {
    crawler: ProgramCrawler,
    extractor: BroadcastExtractor,
    programs: OnceCell<Vec<String>>,
}

impl KolHayStation {
    /// Build the station from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch.clone())?;
        let layout = SiteLayout::kol_hay(&config.site.kol_hay_base_url)?;
        Ok(Self::with_parts(
            ProgramCrawler::new(fetcher, layout),
            BroadcastExtractor::kol_hay()?,
        ))
    }

    /// Build the station from an existing crawler and extractor
    pub fn with_parts(crawler: ProgramCrawler, extractor: BroadcastExtractor) -> Self {
        Self {
            crawler,
            extractor,
            programs: OnceCell::new(),
        }
    }

    async fn programs(&self) -> Result<&[String]> {
        let programs = self
            .programs
            .get_or_try_init(|| self.crawler.program_names())
            .await?;
        Ok(programs.as_slice())
    }

    async fn program_name(&self, program: &ProgramRef) -> Result<String> {
        let programs = self.programs().await?;
        match program {
            ProgramRef::Name(name) => Ok(name.clone()),
            ProgramRef::Index(index) => programs.get(*index).cloned().ok_or_else(|| {
                Error::Selection(format!(
                    "program #{} out of range (station has {} programs)",
                    index + 1,
                    programs.len()
                ))
            }),
        }
    }
}

#[async_trait]
impl Station for KolHayStation {
    fn name(&self) -> &'static str {
        "Kol-Hay"
    }

    async fn load_programs(&self) -> Result<Vec<String>> {
        Ok(self.programs().await?.to_vec())
    }

    async fn load_broadcasts(
        &self,
        program: &ProgramRef,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<Broadcast>> {
        let name = self.program_name(program).await?;
        debug!(program = %name, "Loading broadcasts");

        let detail_urls = self.crawler.detail_links(&name).await?;
        if detail_urls.is_empty() {
            info!(program = %name, "Program has no broadcasts");
            return Ok(Vec::new());
        }

        let pages = self.crawler.fetch_batch(detail_urls, progress).await?;
        let broadcasts = self.extractor.extract_all(
            pages
                .iter()
                .map(|page| (page.url.as_str(), page.content.as_slice())),
        );

        info!(program = %name, broadcasts = broadcasts.len(), "Loaded broadcasts");
        Ok(broadcasts)
    }
}
