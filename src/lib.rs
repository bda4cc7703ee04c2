/// Cinebase - client-side record access for a spreadsheet-backed movie catalog
///
/// The backing store exposes tables as REST resources with no joins and no
/// server-side aggregation. This crate reconstructs the relational views the
/// application needs - a movie with its cast, crew, and reviews; a user with
/// their saved movies; a bookmark state - out of flat per-table fetches and
/// junction rows, tolerating partial failure along the way.

pub mod config;
pub mod error;
pub mod filter;
pub mod records;
pub mod resolver;
pub mod service;
pub mod transport;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use records::{RawRecord, Record, RecordPage};
pub use resolver::{FanIn, RelationResolver};
pub use service::{BookmarkToggle, CineClient, MovieDetailView, ProfileView, ViewerState};
pub use transport::{RecordTransport, RestTransport};
