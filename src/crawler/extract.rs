//! Field extraction from listing, detail, and external metadata pages
//!
//! Every rule is a pure function over a parsed document or fragment. A
//! missing node degrades its field to an empty string, empty list, or 0.0;
//! nothing here returns an error.

use crate::models::{Details, Link, ListingEntryStub};
use crate::url::resolve_href;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

// Listing page
static ENTRY: LazyLock<Selector> = LazyLock::new(|| selector("div.browse-movie-wrap"));
static ENTRY_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.browse-movie-link"));
static ENTRY_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img.img-responsive"));
static ENTRY_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a.browse-movie-title"));
static ENTRY_YEAR: LazyLock<Selector> = LazyLock::new(|| selector("div.browse-movie-year"));

// Detail page
static GENRE_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.hidden-xs"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static LIKES: LazyLock<Selector> = LazyLock::new(|| selector("div.bottom-info span#movie-likes"));
static RATING: LazyLock<Selector> =
    LazyLock::new(|| selector("div.bottom-info span[itemprop=ratingValue]"));
static EXTERNAL_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.icon[href*='imdb.com']"));
static TRAILER_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a.youtube[href*='youtube.com']"));
static SUMMARY_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("div#synopsis p"));
static TORRENT_MODAL: LazyLock<Selector> = LazyLock::new(|| selector(".modal-torrent"));
static QUALITY_SIZE: LazyLock<Selector> = LazyLock::new(|| selector("p.quality-size"));
static MAGNET: LazyLock<Selector> =
    LazyLock::new(|| selector("a.magnet-download.download-torrent.magnet"));

// External metadata page
static POSTER: LazyLock<Selector> = LazyLock::new(|| selector("img.ipc-image"));

static LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?\]\s*").expect("Invalid leading tag regex"));
static LEADING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+").expect("Invalid leading year regex"));
static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("Invalid language tag regex"));
static THOUSANDS_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(,\d{3})+$").expect("Invalid thousands regex"));

/// Concatenated, trimmed text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text nodes of an element, each trimmed, joined by single spaces
fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

// ===== Listing page =====

/// Extracts every listing entry on a listing page, in document order
///
/// Hrefs and image sources are resolved against `page_url`. An entry without
/// a usable link is kept with an empty `detail_url`.
pub fn extract_listing_entries(document: &Html, page_url: &Url) -> Vec<ListingEntryStub> {
    document
        .select(&ENTRY)
        .map(|entry| {
            let href = extract_href(entry);
            let detail_url = resolve_href(page_url, &href).unwrap_or_default();
            if detail_url.is_empty() {
                tracing::warn!("Listing entry without a detail link on {}", page_url);
            }

            let image = extract_image(entry);
            let cover_image_url = resolve_href(page_url, &image).unwrap_or(image);

            ListingEntryStub {
                detail_url,
                name: extract_title(entry),
                year: extract_year(entry),
                cover_image_url,
            }
        })
        .collect()
}

/// Detail page href of a listing entry, or empty
pub fn extract_href(entry: ElementRef<'_>) -> String {
    first_attr(entry, &ENTRY_LINK, "href")
}

/// Cover image source of a listing entry, or empty
pub fn extract_image(entry: ElementRef<'_>) -> String {
    first_attr(entry, &ENTRY_IMAGE, "src")
}

/// Title of a listing entry with any leading `[..]` tag removed
pub fn extract_title(entry: ElementRef<'_>) -> String {
    let title = first_text(entry, &ENTRY_TITLE);
    LEADING_TAG.replace(&title, "").trim().to_string()
}

/// Release year of a listing entry, or empty
pub fn extract_year(entry: ElementRef<'_>) -> String {
    first_text(entry, &ENTRY_YEAR)
}

// ===== Detail page =====

/// Extracts all detail fields from a detail page
pub fn extract_details(document: &Html) -> Details {
    Details {
        genres: extract_genres(document),
        like_count: extract_likes(document),
        rating: extract_rating(document),
        external_metadata_url: extract_external_link(document),
        summary: extract_summary(document),
        trailer_url: extract_trailer_link(document),
    }
}

/// Genres from the heading block of a detail page
///
/// The headings of each block are joined and handed to [`parse_genres`].
pub fn extract_genres(document: &Html) -> Vec<String> {
    let mut genres = Vec::new();

    for block in document.select(&GENRE_BLOCK) {
        let text = block
            .select(&HEADING)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !text.is_empty() {
            genres.extend(parse_genres(&text));
        }
    }

    genres
}

/// Splits a genre line such as `"2016 [Dual Audio] Action / Comedy"`
///
/// Strips a leading year and every bracketed tag, splits on `" / "`, and
/// drops empty tokens.
///
/// # Example
///
/// ```
/// use mogodum::crawler::extract::parse_genres;
///
/// assert_eq!(
///     parse_genres("2016 [Dual Audio] Action / Comedy / Drama"),
///     vec!["Action", "Comedy", "Drama"]
/// );
/// ```
pub fn parse_genres(text: &str) -> Vec<String> {
    let without_year = LEADING_YEAR.replace(text.trim(), "");
    let without_tags = LANGUAGE_TAG.replace_all(without_year.trim(), "");

    without_tags
        .split(" / ")
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like count of a detail page, 0.0 when missing or unparseable
pub fn extract_likes(document: &Html) -> f64 {
    numeric_field(document, &LIKES, "likes")
}

/// Rating of a detail page, 0.0 when missing or unparseable
pub fn extract_rating(document: &Html) -> f64 {
    numeric_field(document, &RATING, "rating")
}

fn numeric_field(document: &Html, selector: &Selector, field: &str) -> f64 {
    let Some(text) = document.select(selector).next().map(element_text) else {
        tracing::debug!("No {} node found", field);
        return 0.0;
    };

    if text.is_empty() {
        tracing::debug!("Empty {} found", field);
        return 0.0;
    }

    match parse_decimal(&text) {
        Some(value) => value,
        None => {
            tracing::warn!("Failed to parse {} from {:?}", field, text);
            0.0
        }
    }
}

/// Parses a number that may use a comma separator
///
/// A thousands-grouped integer (`"1,234"`) drops its commas; a value with
/// both separators (`"1,234.5"`) treats commas as grouping; otherwise a comma
/// is a decimal separator (`"7,5"`).
///
/// # Example
///
/// ```
/// use mogodum::crawler::extract::parse_decimal;
///
/// assert_eq!(parse_decimal("1,234"), Some(1234.0));
/// assert_eq!(parse_decimal("7,5"), Some(7.5));
/// assert_eq!(parse_decimal(""), None);
/// ```
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let normalized = if THOUSANDS_GROUPED.is_match(text) || (text.contains('.') && text.contains(','))
    {
        text.replace(',', "")
    } else {
        text.replace(',', ".")
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First external metadata link on a detail page, or empty
pub fn extract_external_link(document: &Html) -> String {
    first_attr(document.root_element(), &EXTERNAL_LINK, "href")
}

/// First trailer link on a detail page, or empty
pub fn extract_trailer_link(document: &Html) -> String {
    first_attr(document.root_element(), &TRAILER_LINK, "href")
}

/// Synopsis paragraphs, one per line
pub fn extract_summary(document: &Html) -> String {
    document
        .select(&SUMMARY_PARAGRAPH)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One [`Link`] per torrent modal block, in document order
///
/// A block without a magnet anchor still yields a link with empty magnet
/// fields.
pub fn extract_links(document: &Html) -> Vec<Link> {
    document
        .select(&TORRENT_MODAL)
        .map(|block| {
            let quality_label = block
                .select(&QUALITY_SIZE)
                .map(spaced_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            let magnet = block.select(&MAGNET).next();
            let attr = |name: &str| {
                magnet
                    .and_then(|a| a.value().attr(name))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };

            Link {
                quality_label,
                magnet_uri: attr("href"),
                magnet_title: attr("title"),
            }
        })
        .collect()
}

// ===== External metadata page =====

/// Source of the first poster image on the external page, or empty
pub fn extract_poster_image(document: &Html) -> String {
    document
        .select(&POSTER)
        .find_map(|img| img.value().attr("src"))
        .map(|src| src.trim().to_string())
        .unwrap_or_default()
}
