//! Cinemock - in-memory movie database API simulator
//!
//! This library mocks a read-only movie/person/production-company
//! lookup API without any network server: requests are plain path
//! strings resolved synchronously against an in-memory record store.
//! It provides:
//!
//! - Paged listing, id lookup, and multi-collection substring search
//! - A uniform success/error response envelope with timestamps
//! - Staged asynchronous loading of the three collection resources,
//!   tolerating partial failure and reporting per-collection status
//!
//! # Example
//!
//! ```rust,no_run
//! use cinemock::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let loader = DataLoader::new(FileFetcher::new(&config.data));
//!     let store = Arc::new(loader.load().await?);
//!
//!     let api = MovieDatabaseApi::with_store(config.query.clone(), store);
//!     let envelope = api.handle("/api/search?q=brothers");
//!     println!("{}", envelope.to_pretty_json()?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod loader;
pub mod models;
pub mod query;
pub mod response;
pub mod store;

// Re-export main types
pub use api::{MovieDatabaseApi, QueryParams};
pub use config::{Config, ConfigValidationError, DataConfig, QueryConfig, ServiceConfig};
pub use loader::{
    CollectionStatus, DataLoader, FetchError, FileFetcher, LoadState, LoaderError,
    ResourceFetcher,
};
pub use models::{ActingRole, CrewRole, EntityKind, Movie, Person, Producer};
pub use query::{ApiError, Page, PageRequest, Pagination, SearchPayload, SearchResults, SearchScope};
pub use response::{Envelope, ErrorBody};
pub use store::RecordStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::MovieDatabaseApi;
    pub use crate::config::Config;
    pub use crate::loader::{DataLoader, FileFetcher, ResourceFetcher};
    pub use crate::models::EntityKind;
    pub use crate::query::ApiError;
    pub use crate::response::Envelope;
    pub use crate::store::RecordStore;
}
