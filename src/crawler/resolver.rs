//! Detail resolver
//!
//! Turns one listing entry into a full [`Movie`]: detail page first, then the
//! external metadata page when one is linked. Failures degrade the record's
//! [`FetchStatus`] and never propagate.

use crate::crawler::extract::{extract_details, extract_links, extract_poster_image};
use crate::crawler::fetcher::fetch_url;
use crate::models::{DisplayInfo, FetchStatus, ListingEntryStub, Movie};
use reqwest::Client;

/// Resolves listing entries into movie records
#[derive(Debug, Clone)]
pub struct DetailResolver {
    client: Client,
    resolve_external: bool,
}

impl DetailResolver {
    /// Creates a resolver
    ///
    /// With `resolve_external` off the external metadata page is never
    /// requested and `display_info` stays empty.
    pub fn new(client: Client, resolve_external: bool) -> Self {
        Self {
            client,
            resolve_external,
        }
    }

    /// Resolves one stub into a movie
    ///
    /// The returned movie carries `number == 0`; numbering happens after
    /// the page has been reassembled in listing order.
    pub async fn resolve(&self, stub: &ListingEntryStub) -> Movie {
        let mut movie = Movie::from_stub(stub);

        if stub.detail_url.is_empty() {
            tracing::warn!("Skipping {:?}: no detail link", stub.name);
            movie.fetch_status = FetchStatus::DetailUnreachable { code: None };
            return movie;
        }

        let detail = fetch_url(&self.client, &stub.detail_url).await;
        // The parsed document must not live across the external fetch below.
        {
            let Some(document) = detail.document() else {
                tracing::warn!(
                    "Detail page {} unreachable: {}",
                    stub.detail_url,
                    detail.describe()
                );
                movie.fetch_status = FetchStatus::DetailUnreachable {
                    code: detail.status_code(),
                };
                return movie;
            };

            movie.details = extract_details(&document);
            movie.links = extract_links(&document);
        }

        tracing::debug!(
            "Resolved {} ({} links, {} genres)",
            stub.detail_url,
            movie.links.len(),
            movie.details.genres.len()
        );

        if !self.resolve_external || movie.details.external_metadata_url.is_empty() {
            return movie;
        }

        let external = fetch_url(&self.client, &movie.details.external_metadata_url).await;
        match external.document() {
            Some(document) => {
                movie.display_info = DisplayInfo {
                    name: movie.name.clone(),
                    poster_image_url: extract_poster_image(&document),
                };
            }
            None => {
                tracing::warn!(
                    "External page {} unreachable: {}",
                    movie.details.external_metadata_url,
                    external.describe()
                );
                movie.fetch_status = FetchStatus::ExternalUnreachable {
                    code: external.status_code(),
                };
            }
        }

        movie
    }
}
