//! Staged asynchronous data acquisition.
//!
//! Each of the three collections is fetched as one JSON resource
//! through a [`ResourceFetcher`]. The fetches run concurrently and are
//! joined with individual-failure tolerance: a collection that fails to
//! fetch or parse is recorded as `failed` and served empty, and the
//! overall load succeeds as long as at least one collection loads. Only
//! when every collection fails does initialization fail.
//!
//! There is no automatic retry and no timeout beyond the underlying
//! transport's; a manual retry is simply another [`DataLoader::load`]
//! call, which resets every status before re-issuing the same three
//! fetches.

use crate::config::DataConfig;
use crate::models::{EntityKind, Movie, Person, Producer};
use crate::store::RecordStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors fetching or decoding one collection resource
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse resource JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resource root must be a JSON array of records")]
    NotAnArray,
}

/// Errors for the overall load
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("All collections failed to load")]
    AllCollectionsFailed,
}

/// Load lifecycle of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Not attempted yet
    Pending,
    /// Fetch in flight
    Loading,
    /// Fetched and decoded
    Loaded,
    /// Fetch or decode failed
    Failed,
}

/// Observable status of one collection's load.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStatus {
    pub collection: EntityKind,
    pub state: LoadState,
    /// Records decoded (0 unless `Loaded`)
    pub records: usize,
    /// Failure message (set only when `Failed`)
    pub error: Option<String>,
}

impl CollectionStatus {
    fn pending(collection: EntityKind) -> Self {
        Self {
            collection,
            state: LoadState::Pending,
            records: 0,
            error: None,
        }
    }
}

/// Source of raw collection bytes.
///
/// The production implementation reads JSON files; tests substitute
/// in-memory fetchers, including failing ones.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, collection: EntityKind) -> Result<Vec<u8>, FetchError>;
}

/// File-backed fetcher with configurable artificial latency.
pub struct FileFetcher {
    dir: PathBuf,
    movies_file: String,
    persons_file: String,
    producers_file: String,
    delay: Duration,
}

impl FileFetcher {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            movies_file: config.movies_file.clone(),
            persons_file: config.persons_file.clone(),
            producers_file: config.producers_file.clone(),
            delay: Duration::from_millis(config.simulated_delay_ms),
        }
    }

    fn path_for(&self, collection: EntityKind) -> PathBuf {
        let file = match collection {
            EntityKind::Movies => &self.movies_file,
            EntityKind::Persons => &self.persons_file,
            EntityKind::Producers => &self.producers_file,
        };
        self.dir.join(file)
    }
}

#[async_trait]
impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, collection: EntityKind) -> Result<Vec<u8>, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let path = self.path_for(collection);
        debug!(path = %path.display(), "Reading collection resource");
        Ok(tokio::fs::read(&path).await?)
    }
}

/// Loads the three collections and tracks per-collection status.
pub struct DataLoader<F> {
    fetcher: F,
    statuses: RwLock<HashMap<EntityKind, CollectionStatus>>,
}

impl<F: ResourceFetcher> DataLoader<F> {
    pub fn new(fetcher: F) -> Self {
        let statuses = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, CollectionStatus::pending(kind)))
            .collect();

        Self {
            fetcher,
            statuses: RwLock::new(statuses),
        }
    }

    /// Current status of one collection.
    pub fn status(&self, collection: EntityKind) -> CollectionStatus {
        self.statuses.read()[&collection].clone()
    }

    /// Current statuses of all collections, in canonical order.
    pub fn statuses(&self) -> Vec<CollectionStatus> {
        let statuses = self.statuses.read();
        EntityKind::ALL
            .into_iter()
            .map(|kind| statuses[&kind].clone())
            .collect()
    }

    /// Fetch all three collections concurrently and build a store from
    /// whatever loaded.
    ///
    /// Calling this again acts as a manual retry: statuses reset to
    /// `Pending` and the same three fetches are re-issued.
    pub async fn load(&self) -> Result<RecordStore, LoaderError> {
        {
            let mut statuses = self.statuses.write();
            for kind in EntityKind::ALL {
                statuses.insert(kind, CollectionStatus::pending(kind));
            }
        }

        info!("Loading collections");

        let (movies, persons, producers) = futures::join!(
            self.fetch_collection::<Movie>(EntityKind::Movies),
            self.fetch_collection::<Person>(EntityKind::Persons),
            self.fetch_collection::<Producer>(EntityKind::Producers),
        );

        if movies.is_none() && persons.is_none() && producers.is_none() {
            return Err(LoaderError::AllCollectionsFailed);
        }

        let store = RecordStore::new(
            movies.unwrap_or_default(),
            persons.unwrap_or_default(),
            producers.unwrap_or_default(),
        );

        info!(records = store.total_records(), "Collections loaded");

        Ok(store)
    }

    /// Fetch and decode one collection, recording the outcome in its
    /// own status slot. Failures are absorbed here so one bad resource
    /// never cancels the others.
    async fn fetch_collection<T: DeserializeOwned>(&self, collection: EntityKind) -> Option<Vec<T>> {
        self.set_status(collection, LoadState::Loading, 0, None);

        match self.try_fetch::<T>(collection).await {
            Ok(records) => {
                info!(
                    collection = collection.as_str(),
                    records = records.len(),
                    "Collection loaded"
                );
                self.set_status(collection, LoadState::Loaded, records.len(), None);
                Some(records)
            }
            Err(e) => {
                warn!(
                    collection = collection.as_str(),
                    error = %e,
                    "Collection failed to load"
                );
                self.set_status(collection, LoadState::Failed, 0, Some(e.to_string()));
                None
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(
        &self,
        collection: EntityKind,
    ) -> Result<Vec<T>, FetchError> {
        let bytes = self.fetcher.fetch(collection).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if !value.is_array() {
            return Err(FetchError::NotAnArray);
        }
        Ok(serde_json::from_value(value)?)
    }

    fn set_status(
        &self,
        collection: EntityKind,
        state: LoadState,
        records: usize,
        error: Option<String>,
    ) {
        self.statuses.write().insert(
            collection,
            CollectionStatus {
                collection,
                state,
                records,
                error,
            },
        );
    }
}
