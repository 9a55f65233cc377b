//! Persisted movie records
//!
//! Field names serialize as camelCase and are shared by page snapshots and the
//! consolidated artifact.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One listing entry, produced from a listing page and consumed by the
/// detail resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntryStub {
    /// Absolute detail page URL (empty if the entry had no link)
    pub detail_url: String,
    pub name: String,
    pub year: String,
    pub cover_image_url: String,
}

/// One downloadable quality variant of a movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub quality_label: String,
    pub magnet_uri: String,
    pub magnet_title: String,
}

/// Fields extracted from the detail page; every field defaults to empty/zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub genres: Vec<String>,
    pub like_count: f64,
    pub rating: f64,
    pub external_metadata_url: String,
    pub summary: String,
    pub trailer_url: String,
}

/// Display information taken from the external metadata page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub name: String,
    pub poster_image_url: String,
}

/// How far resolution of a movie got
///
/// `code` is `None` when no HTTP status was received (transport failure or
/// no URL to request).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FetchStatus {
    #[default]
    Ok,
    DetailUnreachable { code: Option<u16> },
    ExternalUnreachable { code: Option<u16> },
}

impl FetchStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::DetailUnreachable { code: Some(code) } => write!(f, "detail unreachable ({})", code),
            Self::DetailUnreachable { code: None } => write!(f, "detail unreachable"),
            Self::ExternalUnreachable { code: Some(code) } => {
                write!(f, "external unreachable ({})", code)
            }
            Self::ExternalUnreachable { code: None } => write!(f, "external unreachable"),
        }
    }
}

/// The persisted unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    /// Run-local sequence number, starting at 1, in listing order
    pub number: u64,
    pub source_url: String,
    pub name: String,
    pub year: String,
    #[serde(default)]
    pub cover_image_url: String,
    pub links: Vec<Link>,
    pub details: Details,
    pub display_info: DisplayInfo,
    pub fetch_status: FetchStatus,
}

impl Movie {
    /// Creates an unresolved movie carrying only the listing fields and a
    /// fresh identifier
    pub fn from_stub(stub: &ListingEntryStub) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: 0,
            source_url: stub.detail_url.clone(),
            name: stub.name.clone(),
            year: stub.year.clone(),
            cover_image_url: stub.cover_image_url.clone(),
            links: Vec::new(),
            details: Details::default(),
            display_info: DisplayInfo::default(),
            fetch_status: FetchStatus::Ok,
        }
    }
}
