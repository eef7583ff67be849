//! Node extraction from HTML documents
//!
//! Pages are queried with CSS selectors. Each match is flattened into an
//! [`HtmlNode`] carrying its (resolved) `href` and trimmed text, which is all the
//! crawler and extractor need.
//!
//! Parsed documents are not `Send`; everything here is synchronous and returns
//! owned data so callers never hold a document across an `.await`.

use crate::error::{Error, Result};
use scraper::{Html, Selector};
use url::Url;

/// A matched element reduced to its link target and text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlNode {
    /// `href` attribute, resolved against the page URL when one was given
    pub href: Option<String>,
    /// Concatenated descendant text, trimmed
    pub text: String,
}

/// Compile a CSS selector, mapping parse failures into [`Error::InvalidSelector`]
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Parse raw page bytes (decoded as UTF-8, lossy)
pub fn parse_document(content: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(content))
}

/// Every node matching `sel` in an already-parsed document, in document order
///
/// `base` is the page URL used to resolve relative `href`s; `None` leaves them
/// as-is.
pub fn select_nodes(document: &Html, sel: &Selector, base: Option<&Url>) -> Vec<HtmlNode> {
    document
        .select(sel)
        .map(|element| HtmlNode {
            href: element
                .value()
                .attr("href")
                .map(|href| resolve_href(href.trim(), base)),
            text: element.text().collect::<String>().trim().to_string(),
        })
        .collect()
}

/// Extract every node matching `sel` in document order
///
/// # Arguments
///
/// * `content` - Raw page bytes (decoded as UTF-8, lossy)
/// * `sel` - Compiled selector
/// * `base` - Page URL used to resolve relative `href`s; `None` leaves them as-is
pub fn extract_nodes(content: &[u8], sel: &Selector, base: Option<&Url>) -> Vec<HtmlNode> {
    select_nodes(&parse_document(content), sel, base)
}

/// Collect the `href`s of every node matching `sel`, skipping nodes without one
pub fn extract_links(content: &[u8], sel: &Selector, base: Option<&Url>) -> Vec<String> {
    extract_nodes(content, sel, base)
        .into_iter()
        .filter_map(|node| node.href)
        .collect()
}

fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}
