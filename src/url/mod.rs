//! URL handling for the crawl
//!
//! Builds listing page URLs and resolves hrefs found in listing markup
//! against the page they were found on.

use crate::UrlResult;
use url::Url;

/// Builds the URL of listing page `page` (1-based)
///
/// The page index is appended as the `page` query parameter, replacing any
/// existing one.
///
/// # Example
///
/// ```
/// use mogodum::url::listing_page_url;
///
/// let url = listing_page_url("https://example.com/browse-movies", 3).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/browse-movies?page=3");
/// ```
pub fn listing_page_url(listing_url: &str, page: u32) -> UrlResult<Url> {
    let mut url = Url::parse(listing_url)?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
    }

    Ok(url)
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None for empty hrefs, fragment-only anchors, non-navigational
/// schemes, and anything that does not resolve to http or https.
pub fn resolve_href(base_url: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
