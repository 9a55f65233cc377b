//! Shared fixtures: site markup builders and a config pointed at a mock server

use mogodum::config::Config;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

pub struct Entry<'a> {
    pub href: Option<&'a str>,
    pub title: &'a str,
    pub year: &'a str,
}

pub fn entry<'a>(href: &'a str, title: &'a str, year: &'a str) -> Entry<'a> {
    Entry {
        href: Some(href),
        title,
        year,
    }
}

/// Listing page markup with one `browse-movie-wrap` block per entry
///
/// An entry without an href keeps its title anchor but has no link block.
pub fn listing_page(entries: &[Entry<'_>]) -> String {
    let blocks: String = entries
        .iter()
        .map(|e| match e.href {
            Some(href) => format!(
                r#"<div class="browse-movie-wrap">
                     <a href="{href}" class="browse-movie-link">
                       <figure><img class="img-responsive" src="/assets/cover.jpg"></figure>
                     </a>
                     <div class="browse-movie-bottom">
                       <a href="{href}" class="browse-movie-title">{title}</a>
                       <div class="browse-movie-year">{year}</div>
                     </div>
                   </div>"#,
                href = href,
                title = e.title,
                year = e.year
            ),
            None => format!(
                r#"<div class="browse-movie-wrap">
                     <div class="browse-movie-bottom">
                       <a class="browse-movie-title">{}</a>
                       <div class="browse-movie-year">{}</div>
                     </div>
                   </div>"#,
                e.title, e.year
            ),
        })
        .collect();

    format!(
        r#"<html><body><div class="browse-content">{}</div></body></html>"#,
        blocks
    )
}

/// Detail page markup with two torrent blocks and an optional external link
pub fn detail_page(external_url: Option<&str>) -> String {
    let external = external_url
        .map(|url| format!(r#"<a class="icon" href="{}" title="IMDb Rating">IMDb</a>"#, url))
        .unwrap_or_default();

    format!(
        r#"<html><body>
           <div class="hidden-xs"><h1>Movie</h1><h2>2016</h2><h2>[EN] Drama / Sci-Fi</h2></div>
           <div class="bottom-info">
             <span id="movie-likes">2,345</span>
             {external}
             <span itemprop="ratingValue">7.9</span>
           </div>
           <a class="youtube" href="https://www.youtube.com/embed/abc">Trailer</a>
           <div id="synopsis"><p>A story.</p><p>Another line.</p></div>
           <div class="modal-torrent">
             <p class="quality-size">720p</p>
             <p class="quality-size">File size<br>800 MB</p>
             <a class="magnet-download download-torrent magnet" href="magnet:?xt=urn:btih:720" title="720p Magnet">M</a>
           </div>
           <div class="modal-torrent">
             <p class="quality-size">1080p</p>
             <a class="magnet-download download-torrent magnet" href="magnet:?xt=urn:btih:1080" title="1080p Magnet">M</a>
           </div>
           </body></html>"#,
        external = external
    )
}

pub fn external_page(poster: &str) -> String {
    format!(
        r#"<html><body><div class="poster"><img class="ipc-image" src="{}"></div></body></html>"#,
        poster
    )
}

/// Configuration pointed at `server`, writing into `dir`, with no retry delays
pub fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.scraper.listing_url = format!("{}/browse-movies", server.uri());
    config.scraper.request_timeout_secs = 5;
    config.scraper.connect_timeout_secs = 2;
    config.scraper.max_concurrent_details = 2;
    config.scraper.listing_retries = 0;
    config.scraper.retry_delay_ms = 0;
    config.output.movies_path = path_string(dir.path().join("movies.json"));
    config.output.snapshot_dir = path_string(dir.path().join("movies"));
    config.output.write_retries = 1;
    config
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
