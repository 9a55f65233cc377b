//! Statistics over a persisted movie artifact
//!
//! Used by the `--stats` command and logged at the end of every run.

use crate::models::{FetchStatus, Movie};
use std::collections::BTreeMap;

/// Summary of one set of movie records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieStatistics {
    pub total_movies: usize,

    /// Movies fully resolved
    pub resolved: usize,

    /// Movies whose detail page could not be fetched
    pub detail_unreachable: usize,

    /// Movies whose external metadata page could not be fetched
    pub external_unreachable: usize,

    /// Movies with at least one magnet link
    pub with_links: usize,

    /// Movies with a poster image from the external page
    pub with_poster: usize,

    /// Genre -> number of movies tagged with it
    pub genres: BTreeMap<String, usize>,
}

/// Computes statistics for a set of movies
pub fn compute_statistics(movies: &[Movie]) -> MovieStatistics {
    let mut stats = MovieStatistics {
        total_movies: movies.len(),
        ..MovieStatistics::default()
    };

    for movie in movies {
        match movie.fetch_status {
            FetchStatus::Ok => stats.resolved += 1,
            FetchStatus::DetailUnreachable { .. } => stats.detail_unreachable += 1,
            FetchStatus::ExternalUnreachable { .. } => stats.external_unreachable += 1,
        }

        if !movie.links.is_empty() {
            stats.with_links += 1;
        }
        if !movie.display_info.poster_image_url.is_empty() {
            stats.with_poster += 1;
        }
        for genre in &movie.details.genres {
            *stats.genres.entry(genre.clone()).or_insert(0) += 1;
        }
    }

    stats
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &MovieStatistics) {
    println!("=== Movie Statistics ===\n");

    println!("Overview:");
    println!("  Total movies: {}", stats.total_movies);
    println!("  With magnet links: {}", stats.with_links);
    println!("  With poster image: {}", stats.with_poster);
    println!();

    println!("Fetch Status:");
    println!("  ok: {}", stats.resolved);
    println!("  detail unreachable: {}", stats.detail_unreachable);
    println!("  external unreachable: {}", stats.external_unreachable);
    println!();

    if !stats.genres.is_empty() {
        println!("Genres ({}):", stats.genres.len());
        let mut genre_counts: Vec<_> = stats.genres.iter().collect();
        genre_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (genre, count) in genre_counts {
            println!("  {}: {}", genre, count);
        }
        println!();
    }

    let success_rate = if stats.total_movies > 0 {
        (stats.resolved as f64 / stats.total_movies as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} movies fully resolved)",
        success_rate, stats.resolved, stats.total_movies
    );
}
