//! Simulated request surface.
//!
//! There is no network listener: callers hand in a path of the shape
//! `/api/{movies|persons|producers}[/{id}]` or `/api/search` with an
//! optional query string, and get back the uniform response envelope.
//! Every outcome, including unknown endpoints, bad parameters, a store
//! that has not finished loading, and unexpected faults, resolves to an
//! envelope; nothing escapes as a panic or process-fatal error.

use crate::config::QueryConfig;
use crate::models::EntityKind;
use crate::query::{self, ApiError, PageRequest, SearchScope};
use crate::response::Envelope;
use crate::store::RecordStore;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Parsed query-string parameters.
///
/// Later duplicates are ignored; `+` and `%XX` escapes are decoded.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Item payload for by-id endpoints.
#[derive(Debug, Serialize)]
struct Item<T> {
    data: T,
}

/// The simulated movie database API.
///
/// Holds the query defaults and, once loading has finished, the shared
/// record store. Requests arriving before a store is attached get a
/// 503 envelope.
pub struct MovieDatabaseApi {
    store: RwLock<Option<Arc<RecordStore>>>,
    query: QueryConfig,
}

impl MovieDatabaseApi {
    /// Create an API with no store attached yet; requests get a 503
    /// until the loader finishes and the store is attached.
    pub fn new(query: QueryConfig) -> Self {
        Self {
            store: RwLock::new(None),
            query,
        }
    }

    /// Create an API already serving `store`.
    pub fn with_store(query: QueryConfig, store: Arc<RecordStore>) -> Self {
        Self {
            store: RwLock::new(Some(store)),
            query,
        }
    }

    /// Attach the store once loading completes. Each fetch wrote only
    /// its own collection; the assembled store is swapped in whole.
    pub fn attach_store(&self, store: Arc<RecordStore>) {
        *self.store.write() = Some(store);
    }

    /// Resolve one simulated request to an envelope.
    ///
    /// `request` is the path plus optional query string; a leading `#`
    /// (hash-routing style) is accepted and stripped.
    pub fn handle(&self, request: &str) -> Envelope {
        let trimmed = request.trim().trim_start_matches('#');
        let (path, query) = trimmed.split_once('?').unwrap_or((trimmed, ""));
        let params = QueryParams::parse(query);

        debug!(path = %path, "Dispatching simulated request");

        match self.dispatch(path, &params) {
            Ok(envelope) => envelope,
            Err(err) => {
                if matches!(err, ApiError::Internal(_)) {
                    error!(path = %path, error = %err, "Request failed unexpectedly");
                }
                Envelope::failure(&err)
            }
        }
    }

    fn dispatch(&self, path: &str, params: &QueryParams) -> Result<Envelope, ApiError> {
        let store = self
            .store
            .read()
            .clone()
            .ok_or(ApiError::ServiceUnavailable)?;

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["api", "movies"] => {
                let genre = params.get("genre").filter(|g| !g.is_empty());
                let page = query::list_movies(&store, &self.page_request(params), genre);
                Envelope::success(&page)
            }
            ["api", "movies", id] => {
                let movie = query::movie_by_id(&store, parse_id(EntityKind::Movies, id)?)?;
                Envelope::success(&Item { data: movie })
            }
            ["api", "persons"] => {
                let page = query::list_persons(&store, &self.page_request(params));
                Envelope::success(&page)
            }
            ["api", "persons", id] => {
                let person = query::person_by_id(&store, parse_id(EntityKind::Persons, id)?)?;
                Envelope::success(&Item { data: person })
            }
            ["api", "producers"] => {
                let page = query::list_producers(&store, &self.page_request(params));
                Envelope::success(&page)
            }
            ["api", "producers", id] => {
                let producer =
                    query::producer_by_id(&store, parse_id(EntityKind::Producers, id)?)?;
                Envelope::success(&Item { data: producer })
            }
            ["api", "search"] => {
                let q = params.get("q").unwrap_or("");
                let scope = SearchScope::from_param(params.get("type"));
                Envelope::success(&query::search(&store, q, scope)?)
            }
            _ => Err(ApiError::NotFound("Endpoint not found".to_string())),
        }
    }

    /// Pagination window from the request parameters: unusable values
    /// fall back to the defaults, the limit is capped.
    fn page_request(&self, params: &QueryParams) -> PageRequest {
        let limit = params
            .get("limit")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(self.query.default_limit)
            .min(self.query.max_limit);
        let offset = params
            .get("offset")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        PageRequest { limit, offset }
    }
}

/// An id segment that does not parse as a number can match no record,
/// so it lands in the same class as an unknown id.
fn parse_id(kind: EntityKind, raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| {
        ApiError::NotFound(format!("{} with id {} not found", kind.singular(), raw))
    })
}
