//! Data model shared by the crawler, the persister, and the HTTP surface

mod movie;
mod request;

pub use movie::{Details, DisplayInfo, FetchStatus, Link, ListingEntryStub, Movie};
pub use request::ScrapeRequest;
