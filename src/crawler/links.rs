//! Anchor extraction for sitemap pages
//!
//! Every href is resolved against the page's base URL before the caller's
//! predicate sees it, so callers only ever deal with absolute URLs.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An anchor target together with its visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Absolute URL the anchor points at
    pub url: Url,
    /// Visible text, each text node trimmed and concatenated
    pub text: String,
}

/// Extracts the anchors whose resolved target satisfies `predicate`
///
/// Links come back in document order. Duplicates are kept.
///
/// **Exclude:**
/// - empty hrefs and fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that does not resolve to http(s)
///
/// # Example
///
/// ```
/// use good_spots::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/sitemap/tokyo/A1301/">Ginza</a><a href="/about">About</a>"#;
/// let base = Url::parse("https://tabelog.com/sitemap/tokyo/").unwrap();
/// let links = extract_links(html, &base, |url| url.path().starts_with("/sitemap/"));
///
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url.as_str(), "https://tabelog.com/sitemap/tokyo/A1301/");
/// assert_eq!(links[0].text, "Ginza");
/// ```
pub fn extract_links<P>(html: &str, base_url: &Url, predicate: P) -> Vec<ExtractedLink>
where
    P: Fn(&Url) -> bool,
{
    let document = Html::parse_document(html);
    let base_url = document_base(&document, base_url);
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        // Predicates only ever see absolute URLs
        let Some(url) = resolve_link(href, &base_url) else {
            tracing::trace!("Skipping unresolvable href {:?}", href);
            continue;
        };

        if predicate(&url) {
            links.push(ExtractedLink {
                url,
                text: visible_text(&element),
            });
        }
    }

    links
}

/// Text of an element with each text node stripped, then concatenated
pub fn visible_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// Honors a `<base href>` element if the document declares one
fn document_base(document: &Html, fallback: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| fallback.join(href.trim()).ok())
        })
        .unwrap_or_else(|| fallback.clone())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
