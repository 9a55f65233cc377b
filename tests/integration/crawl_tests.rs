//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! listing → detail → external pipeline end-to-end.

use crate::support::{detail_page, entry, external_page, listing_page, test_config, Entry};
use mogodum::config::Config;
use mogodum::crawler::{build_http_client, Coordinator};
use mogodum::output::{JsonMovieStore, MovieStore};
use mogodum::{FetchStatus, Movie, RunState, ScrapeError, ScrapeRequest, StatusTracker};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, page: u32, entries: &[Entry<'_>]) {
    Mock::given(method("GET"))
        .and(path("/browse-movies"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(entries)))
        .mount(server)
        .await;
}

async fn run(
    config: Config,
    tracker: &StatusTracker,
    pages: i64,
) -> Result<Vec<Movie>, ScrapeError> {
    let client = build_http_client(&config.scraper).expect("client");
    let store: Arc<dyn MovieStore> = Arc::new(JsonMovieStore::from_config(&config.output));
    Coordinator::try_start(
        Arc::new(config),
        client,
        tracker.clone(),
        store,
        &ScrapeRequest::new(pages),
    )?
    .run()
    .await
}

#[tokio::test]
async fn test_two_page_run_with_degraded_entries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let external_url = format!("{}/imdb.com/title/tt0001", server.uri());

    mount_listing(
        &server,
        1,
        &[
            entry("/movies/arrival-2016", "Arrival", "2016"),
            entry("/movies/missing-2001", "[GR] Missing", "2001"),
            Entry {
                href: None,
                title: "Broken",
                year: "1999",
            },
        ],
    )
    .await;

    // Listing page 2 keeps failing; one retry is allowed.
    Mock::given(method("GET"))
        .and(path("/browse-movies"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    mount_html(
        &server,
        "/movies/arrival-2016",
        detail_page(Some(&external_url)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/movies/missing-2001"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/imdb.com/title/tt0001",
        external_page("https://img.example.org/arrival.jpg"),
    )
    .await;

    let mut config = test_config(&server, &dir);
    config.scraper.listing_retries = 1;
    let tracker = StatusTracker::new();

    let movies = run(config.clone(), &tracker, 2).await.expect("run succeeds");

    assert_eq!(movies.len(), 3);
    let numbers: Vec<u64> = movies.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    let ids: HashSet<_> = movies.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 3);

    let arrival = &movies[0];
    assert_eq!(arrival.fetch_status, FetchStatus::Ok);
    assert_eq!(arrival.source_url, format!("{}/movies/arrival-2016", server.uri()));
    assert_eq!(arrival.cover_image_url, format!("{}/assets/cover.jpg", server.uri()));
    assert_eq!(arrival.details.genres, vec!["Drama", "Sci-Fi"]);
    assert_eq!(arrival.details.like_count, 2345.0);
    assert_eq!(arrival.details.rating, 7.9);
    assert_eq!(arrival.details.summary, "A story.\nAnother line.");
    assert_eq!(arrival.details.external_metadata_url, external_url);
    assert_eq!(arrival.links.len(), 2);
    assert_eq!(arrival.links[0].quality_label, "720p File size 800 MB");
    assert_eq!(arrival.links[1].magnet_uri, "magnet:?xt=urn:btih:1080");
    assert_eq!(arrival.display_info.name, "Arrival");
    assert_eq!(
        arrival.display_info.poster_image_url,
        "https://img.example.org/arrival.jpg"
    );

    assert_eq!(movies[1].name, "Missing");
    assert_eq!(
        movies[1].fetch_status,
        FetchStatus::DetailUnreachable { code: Some(404) }
    );
    assert_eq!(movies[2].name, "Broken");
    assert_eq!(
        movies[2].fetch_status,
        FetchStatus::DetailUnreachable { code: None }
    );

    match tracker.current_state() {
        RunState::Completed {
            pages_completed,
            pages_failed,
            total_movies,
            ..
        } => {
            assert_eq!(pages_completed, 2);
            assert_eq!(pages_failed, 1);
            assert_eq!(total_movies, 3);
        }
        other => panic!("expected Completed, got {:?}", other),
    }

    let store = JsonMovieStore::from_config(&config.output);
    assert_eq!(store.load().unwrap(), movies);
    assert!(store.snapshot_path(1).exists());
    assert!(!store.snapshot_path(2).exists());
}

#[tokio::test]
async fn test_failed_middle_page_does_not_stop_later_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &[entry("/movies/a", "A", "2001")]).await;
    Mock::given(method("GET"))
        .and(path("/browse-movies"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    mount_listing(
        &server,
        3,
        &[
            entry("/movies/c", "C", "2003"),
            entry("/movies/d", "D", "2004"),
        ],
    )
    .await;
    for route in ["/movies/a", "/movies/c", "/movies/d"] {
        mount_html(&server, route, detail_page(None)).await;
    }

    let mut config = test_config(&server, &dir);
    config.scraper.listing_retries = 0;
    let tracker = StatusTracker::new();

    let movies = run(config.clone(), &tracker, 3).await.expect("run succeeds");

    let order: Vec<(&str, u64)> = movies.iter().map(|m| (m.name.as_str(), m.number)).collect();
    assert_eq!(order, vec![("A", 1), ("C", 2), ("D", 3)]);

    match tracker.current_state() {
        RunState::Completed {
            pages_completed,
            pages_failed,
            total_movies,
            ..
        } => {
            assert_eq!(pages_completed, 3);
            assert_eq!(pages_failed, 1);
            assert_eq!(total_movies, 3);
        }
        other => panic!("expected Completed, got {:?}", other),
    }

    let store = JsonMovieStore::from_config(&config.output);
    assert!(store.snapshot_path(1).exists());
    assert!(!store.snapshot_path(2).exists());
    assert!(store.snapshot_path(3).exists());
    assert_eq!(store.load().unwrap(), movies);
}

#[tokio::test]
async fn test_external_failure_keeps_details() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let external_url = format!("{}/imdb.com/title/tt0002", server.uri());

    mount_listing(&server, 1, &[entry("/movies/heat-1995", "Heat", "1995")]).await;
    mount_html(&server, "/movies/heat-1995", detail_page(Some(&external_url))).await;
    Mock::given(method("GET"))
        .and(path("/imdb.com/title/tt0002"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let tracker = StatusTracker::new();
    let movies = run(test_config(&server, &dir), &tracker, 1).await.unwrap();

    let heat = &movies[0];
    assert_eq!(
        heat.fetch_status,
        FetchStatus::ExternalUnreachable { code: Some(503) }
    );
    assert_eq!(heat.details.genres, vec!["Drama", "Sci-Fi"]);
    assert_eq!(heat.links.len(), 2);
    assert_eq!(heat.display_info, Default::default());
}

#[tokio::test]
async fn test_external_resolution_can_be_disabled() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let external_url = format!("{}/imdb.com/title/tt0003", server.uri());

    mount_listing(&server, 1, &[entry("/movies/up-2009", "Up", "2009")]).await;
    mount_html(&server, "/movies/up-2009", detail_page(Some(&external_url))).await;
    Mock::given(method("GET"))
        .and(path("/imdb.com/title/tt0003"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, &dir);
    config.scraper.resolve_external = false;
    let movies = run(config, &StatusTracker::new(), 1).await.unwrap();

    assert_eq!(movies[0].fetch_status, FetchStatus::Ok);
    assert_eq!(movies[0].details.external_metadata_url, external_url);
    assert_eq!(movies[0].display_info.poster_image_url, "");
}

#[tokio::test]
async fn test_listing_order_survives_parallel_resolution() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &server,
        1,
        &[
            entry("/movies/slow", "Slow", "2001"),
            entry("/movies/medium", "Medium", "2002"),
            entry("/movies/fast", "Fast", "2003"),
        ],
    )
    .await;
    mount_listing(&server, 2, &[entry("/movies/next", "Next", "2004")]).await;

    for (route, delay_ms) in [
        ("/movies/slow", 400),
        ("/movies/medium", 200),
        ("/movies/fast", 0),
        ("/movies/next", 0),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_page(None))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let mut config = test_config(&server, &dir);
    config.scraper.max_concurrent_details = 3;
    let movies = run(config, &StatusTracker::new(), 2).await.unwrap();

    let order: Vec<(&str, u64)> = movies.iter().map(|m| (m.name.as_str(), m.number)).collect();
    assert_eq!(
        order,
        vec![("Slow", 1), ("Medium", 2), ("Fast", 3), ("Next", 4)]
    );
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let agent = "mogodum-test/1.0";

    Mock::given(method("GET"))
        .and(path("/browse-movies"))
        .and(header("user-agent", agent))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[entry(
            "/movies/m",
            "M",
            "1931",
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies/m"))
        .and(header("user-agent", agent))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(None)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server, &dir);
    config.scraper.user_agent = agent.to_string();
    let movies = run(config, &StatusTracker::new(), 1).await.unwrap();

    assert_eq!(movies[0].fetch_status, FetchStatus::Ok);
}

#[tokio::test]
async fn test_client_errors_on_listing_are_not_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/browse-movies"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server, &dir);
    config.scraper.listing_retries = 3;
    let tracker = StatusTracker::new();
    let movies = run(config, &tracker, 1).await.unwrap();

    assert!(movies.is_empty());
    assert!(matches!(
        tracker.current_state(),
        RunState::Completed { pages_failed: 1, .. }
    ));
}

#[tokio::test]
async fn test_snapshot_failure_only_fails_mandatory_runs() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, &[entry("/movies/m", "M", "1931")]).await;
    mount_html(&server, "/movies/m", detail_page(None)).await;

    for mandatory in [false, true] {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut config = test_config(&server, &dir);
        config.output.snapshot_dir = blocker.join("movies").to_string_lossy().into_owned();
        config.output.persistence_mandatory = mandatory;
        let tracker = StatusTracker::new();

        let result = run(config, &tracker, 1).await;

        if mandatory {
            assert!(matches!(result, Err(ScrapeError::Output(_))));
            assert!(matches!(tracker.current_state(), RunState::Failed { .. }));
            assert!(!dir.path().join("movies.json").exists());
        } else {
            assert_eq!(result.unwrap().len(), 1);
            assert!(matches!(tracker.current_state(), RunState::Completed { .. }));
            assert!(dir.path().join("movies.json").exists());
        }
    }
}

#[tokio::test]
async fn test_runs_do_not_share_accumulated_movies() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_listing(&server, 1, &[entry("/movies/m", "M", "1931")]).await;
    mount_html(&server, "/movies/m", detail_page(None)).await;

    let tracker = StatusTracker::new();
    let first = run(test_config(&server, &dir), &tracker, 1).await.unwrap();
    let second = run(test_config(&server, &dir), &tracker, 1).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].number, 1);
    assert_ne!(first[0].id, second[0].id);
}
