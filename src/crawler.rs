//! Program page crawler
//!
//! Turns a program name into the ordered list of its broadcast detail pages:
//!
//! 1. Search the site for the program name.
//! 2. Follow the first search hit to a broadcast page and take its deepest
//!    breadcrumb link, which is the program's canonical root page.
//! 3. Recover the program slug from that URL.
//! 4. Read the page count from the root page's pagination control (1 if absent).
//! 5. Fetch every listing page concurrently and collect detail-page links in
//!    page order.
//!
//! A missing node anywhere in steps 1-3 means "no broadcasts", not an error.

use crate::config::PartialFailurePolicy;
use crate::error::{Error, Result};
use crate::html::{self, extract_links, extract_nodes};
use crate::http::HttpFetcher;
use crate::types::ProgressFn;
use regex::Regex;
use scraper::Selector;
use tracing::{debug, info, warn};
use url::Url;

/// URL templates, selectors and patterns describing one station site
#[derive(Clone, Debug)]
pub struct SiteLayout {
    base: Url,
    /// Program catalog (`<option>`s of the program drop-down)
    pub catalog: Selector,
    /// Search result links
    pub search_results: Selector,
    /// Breadcrumb trail links on a broadcast page
    pub breadcrumbs: Selector,
    /// Pagination control links on a program page
    pub pagination: Selector,
    /// Detail-page links on a listing page
    pub listing_links: Selector,
    slug_pattern: Regex,
    page_pattern: Regex,
}

impl SiteLayout {
    /// Layout of the Kol-Hay (93fm) site rooted at `base_url`
    pub fn kol_hay(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base,
            catalog: html::selector("select.program-name > option")?,
            search_results: html::selector("div.list > ul > li > a")?,
            breadcrumbs: html::selector("p#breadcrumbs > span > span > a")?,
            pagination: html::selector("ul.pagination > li > a")?,
            listing_links: html::selector(
                "section.latest-broadcasts > ul > li > article > h1 > a",
            )?,
            slug_pattern: compile(r"/program/([^/]+)/")?,
            page_pattern: compile(r"/page/(\d+)(?:/|$)")?,
        })
    }

    /// Page listing every program
    pub fn catalog_url(&self) -> String {
        self.url("radio/broadcast/")
    }

    /// Search endpoint for an already-normalized program name
    pub fn search_url(&self, normalized_name: &str) -> String {
        format!("{}?program-name={}", self.catalog_url(), normalized_name)
    }

    /// Listing page `page` (1-based) of the program `slug`
    pub fn listing_url(&self, slug: &str, page: usize) -> String {
        self.url(&format!("radio/program/{}/page/{}", slug, page))
    }

    /// Program slug embedded in a program page URL
    pub fn extract_slug(&self, url: &str) -> Option<String> {
        self.slug_pattern
            .captures(url)
            .map(|caps| caps[1].to_string())
    }

    /// Number of listing pages advertised by a program root page
    ///
    /// Takes the highest page number linked from the pagination control. A page
    /// without a pagination control (or without numbered links) has one page.
    pub fn page_count(&self, root_page: &[u8]) -> usize {
        extract_links(root_page, &self.pagination, None)
            .iter()
            .filter_map(|href| {
                self.page_pattern
                    .captures(href)
                    .and_then(|caps| caps[1].parse::<usize>().ok())
            })
            .max()
            .unwrap_or(1)
            .max(1)
    }

    fn url(&self, path: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{}/{}", base, path)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("invalid pattern '{}': {}", pattern, e)))
}

/// Turn a program name into its search-query form
///
/// Spaces become `+`; everything else that is not URL-safe is percent-encoded.
pub fn normalize_program_name(name: &str) -> String {
    name.trim()
        .split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// A program's canonical root and page count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramRoot {
    /// Site-internal program identifier
    pub slug: String,
    /// Canonical program page (deepest breadcrumb)
    pub root_url: String,
    /// Number of listing pages, at least 1
    pub page_count: usize,
}

/// A fetched page paired with the URL it came from
#[derive(Clone, Debug)]
pub struct FetchedPage {
    /// Page URL
    pub url: String,
    /// Page body
    pub content: Vec<u8>,
}

/// Walks a station site from program name to detail-page URLs
#[derive(Clone)]
pub struct ProgramCrawler {
    fetcher: HttpFetcher,
    layout: SiteLayout,
}

impl ProgramCrawler {
    /// Create a new crawler
    pub fn new(fetcher: HttpFetcher, layout: SiteLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Site layout in use
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Underlying fetcher
    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Load the program catalog: trimmed option texts, placeholder option dropped
    pub async fn program_names(&self) -> Result<Vec<String>> {
        let url = self.layout.catalog_url();
        let page = self.fetcher.fetch_page(&url).await?;

        let names: Vec<String> = extract_nodes(&page, &self.layout.catalog, None)
            .into_iter()
            .skip(1)
            .map(|node| node.text)
            .collect();

        info!(programs = names.len(), "Loaded program catalog");
        Ok(names)
    }

    /// Resolve a program name to its canonical root and page count
    ///
    /// Returns `Ok(None)` when the search has no hit, the hit has no breadcrumb
    /// trail, or the breadcrumb URL does not carry a slug.
    pub async fn resolve_root(&self, program_name: &str) -> Result<Option<ProgramRoot>> {
        let search_url = self.layout.search_url(&normalize_program_name(program_name));
        let search_page = self.fetcher.fetch_page(&search_url).await?;
        let search_base = Url::parse(&search_url).ok();

        let Some(hit) = extract_links(&search_page, &self.layout.search_results, search_base.as_ref())
            .into_iter()
            .next()
        else {
            info!(program = %program_name, "No search results for program");
            return Ok(None);
        };

        let hit_page = self.fetcher.fetch_page(&hit).await?;
        let hit_base = Url::parse(&hit).ok();
        let Some(root_url) = extract_links(&hit_page, &self.layout.breadcrumbs, hit_base.as_ref())
            .into_iter()
            .last()
        else {
            info!(program = %program_name, page = %hit, "No breadcrumb trail on search hit");
            return Ok(None);
        };

        let Some(slug) = self.layout.extract_slug(&root_url) else {
            info!(program = %program_name, url = %root_url, "Program URL carries no slug");
            return Ok(None);
        };

        let root_page = self.fetcher.fetch_page(&root_url).await?;
        let page_count = self.layout.page_count(&root_page);
        debug!(slug = %slug, pages = page_count, "Resolved program root");

        Ok(Some(ProgramRoot {
            slug,
            root_url,
            page_count,
        }))
    }

    /// Every listing-page URL of a resolved program, pages 1 through `page_count`
    pub fn listing_urls(&self, root: &ProgramRoot) -> Vec<String> {
        (1..=root.page_count)
            .map(|page| self.layout.listing_url(&root.slug, page))
            .collect()
    }

    /// Resolve a program and list its detail-page URLs in page order
    ///
    /// An unresolvable program yields an empty list.
    pub async fn detail_links(&self, program_name: &str) -> Result<Vec<String>> {
        let Some(root) = self.resolve_root(program_name).await? else {
            return Ok(Vec::new());
        };

        let urls = self.listing_urls(&root);
        let pages = self.fetch_batch(urls, None).await?;

        let links: Vec<String> = pages
            .iter()
            .flat_map(|page| {
                let base = Url::parse(&page.url).ok();
                extract_links(&page.content, &self.layout.listing_links, base.as_ref())
            })
            .collect();

        info!(
            slug = %root.slug,
            listing_pages = pages.len(),
            detail_pages = links.len(),
            "Collected detail links"
        );
        Ok(links)
    }

    /// Fetch a batch of pages under the configured connection ceiling
    ///
    /// Applies [`PartialFailurePolicy`]: `Abort` fails on the first error,
    /// `Skip` drops pages whose fetch failed (network error or HTTP status).
    /// Any other error still fails the batch. Surviving pages keep input order.
    pub async fn fetch_batch(
        &self,
        urls: Vec<String>,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<FetchedPage>> {
        let config = self.fetcher.config();
        let connections = config.page_connections;

        match config.partial_failure {
            PartialFailurePolicy::Abort => {
                let contents = self.fetcher.fetch_pages(&urls, connections, progress).await?;
                Ok(urls
                    .into_iter()
                    .zip(contents)
                    .map(|(url, content)| FetchedPage { url, content })
                    .collect())
            }
            PartialFailurePolicy::Skip => {
                let results = self
                    .fetcher
                    .fetch_pages_settled(&urls, connections, progress)
                    .await;
                let mut pages = Vec::with_capacity(urls.len());
                for (url, result) in urls.into_iter().zip(results) {
                    match result {
                        Ok(content) => pages.push(FetchedPage { url, content }),
                        Err(e) if e.is_fetch_error() => {
                            warn!(url = %url, error = %e, "Skipping page that failed to fetch");
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(pages)
            }
        }
    }
}
