//! Query engine: pure reads over an immutable [`RecordStore`].
//!
//! Three operations, mirroring the simulated endpoints: paged listing
//! (with a movies-only genre filter), id lookup, and multi-collection
//! text search. All matching is case-insensitive substring matching;
//! results carry no ranking.

use crate::models::{EntityKind, Movie, Person, Producer};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced at the query-engine boundary.
///
/// Every variant maps to an HTTP-style status code and is turned into
/// the uniform error envelope by the dispatcher; none of them are ever
/// fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Unknown endpoint or entity id (404).
    #[error("{0}")]
    NotFound(String),

    /// Missing required request parameter (400).
    #[error("{0}")]
    BadRequest(String),

    /// Collections are not loaded yet (503).
    #[error("Data is still loading, try again shortly")]
    ServiceUnavailable,

    /// Unexpected internal fault (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The status code reported in the response envelope.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::ServiceUnavailable => 503,
            ApiError::Internal(_) => 500,
        }
    }
}

/// Slice-based pagination window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records to return
    pub limit: usize,
    /// Number of matching records to skip
    pub offset: usize,
}

/// Pagination metadata returned alongside every list page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Total matching records before the window was applied
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    /// Whether records remain past this window
    pub has_more: bool,
}

/// One page of records plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Per-collection search result lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub movies: Vec<Movie>,
    pub persons: Vec<Person>,
    pub producers: Vec<Producer>,
}

/// Payload of a successful search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPayload {
    pub query: String,
    pub total_results: usize,
    pub results: SearchResults,
}

/// Which collections a search touches.
///
/// A `type` parameter naming no known collection matches no collection
/// at all: the search succeeds with empty results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// No type given: search all three collections
    All,
    /// Restrict to one collection
    Only(EntityKind),
    /// Type given but not a collection name
    Unmatched,
}

impl SearchScope {
    /// Derive the scope from the raw `type` parameter.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None => SearchScope::All,
            Some(raw) if raw.is_empty() => SearchScope::All,
            Some(raw) => EntityKind::parse(raw)
                .map(SearchScope::Only)
                .unwrap_or(SearchScope::Unmatched),
        }
    }

    fn includes(&self, kind: EntityKind) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Only(only) => *only == kind,
            SearchScope::Unmatched => false,
        }
    }
}

/// List movies, optionally keeping only those whose genre list contains
/// a case-insensitive substring match for `genre`.
pub fn list_movies(store: &RecordStore, page: &PageRequest, genre: Option<&str>) -> Page<Movie> {
    let needle = genre.map(str::to_lowercase);
    let matched: Vec<&Movie> = store
        .movies()
        .iter()
        .filter(|movie| match &needle {
            Some(genre) => movie
                .genres
                .iter()
                .any(|g| g.to_lowercase().contains(genre)),
            None => true,
        })
        .collect();
    paginate(matched, page)
}

pub fn list_persons(store: &RecordStore, page: &PageRequest) -> Page<Person> {
    paginate(store.persons().iter().collect(), page)
}

pub fn list_producers(store: &RecordStore, page: &PageRequest) -> Page<Producer> {
    paginate(store.producers().iter().collect(), page)
}

/// Look up a movie by exact id.
pub fn movie_by_id(store: &RecordStore, id: u64) -> Result<Movie, ApiError> {
    store
        .movies()
        .iter()
        .find(|m| m.id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Movie with id {} not found", id)))
}

/// Look up a person by exact id.
pub fn person_by_id(store: &RecordStore, id: u64) -> Result<Person, ApiError> {
    store
        .persons()
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Person with id {} not found", id)))
}

/// Look up a production company by exact id.
pub fn producer_by_id(store: &RecordStore, id: u64) -> Result<Producer, ApiError> {
    store
        .producers()
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Producer with id {} not found", id)))
}

/// Search the collections in `scope` for a case-insensitive substring
/// match. Movies match on title, overview, or any genre; persons on
/// name; producers on name or origin country.
///
/// An empty query is rejected with a bad-request error.
pub fn search(
    store: &RecordStore,
    query: &str,
    scope: SearchScope,
) -> Result<SearchPayload, ApiError> {
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "Search query parameter \"q\" is required".to_string(),
        ));
    }

    let needle = query.to_lowercase();
    let mut results = SearchResults::default();

    if scope.includes(EntityKind::Movies) {
        results.movies = store
            .movies()
            .iter()
            .filter(|movie| {
                movie.title.to_lowercase().contains(&needle)
                    || movie.overview.to_lowercase().contains(&needle)
                    || movie.genres.iter().any(|g| g.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
    }

    if scope.includes(EntityKind::Persons) {
        results.persons = store
            .persons()
            .iter()
            .filter(|person| person.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }

    if scope.includes(EntityKind::Producers) {
        results.producers = store
            .producers()
            .iter()
            .filter(|producer| {
                producer.name.to_lowercase().contains(&needle)
                    || producer.origin_country.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
    }

    let total_results = results.movies.len() + results.persons.len() + results.producers.len();

    Ok(SearchPayload {
        query: query.to_string(),
        total_results,
        results,
    })
}

fn paginate<T: Clone>(matched: Vec<&T>, page: &PageRequest) -> Page<T> {
    let total = matched.len();
    let data: Vec<T> = matched
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect();

    Page {
        data,
        pagination: Pagination {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.offset.saturating_add(page.limit) < total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::sample()
    }

    #[test]
    fn test_list_page_length_never_exceeds_limit() {
        let store = store();
        for limit in 0..4 {
            for offset in 0..4 {
                let page = list_movies(&store, &PageRequest { limit, offset }, None);
                assert!(page.data.len() <= limit);
                assert_eq!(page.pagination.total, 2);
                assert_eq!(
                    page.pagination.has_more,
                    offset + limit < page.pagination.total
                );
            }
        }
    }

    #[test]
    fn test_list_offset_walks_the_collection() {
        let store = store();
        let first = list_movies(&store, &PageRequest { limit: 1, offset: 0 }, None);
        let second = list_movies(&store, &PageRequest { limit: 1, offset: 1 }, None);

        assert_eq!(first.data[0].id, 1997);
        assert!(first.pagination.has_more);
        assert_eq!(second.data[0].id, 1998);
        assert!(!second.pagination.has_more);
    }

    #[test]
    fn test_list_offset_past_the_end() {
        let store = store();
        let page = list_persons(&store, &PageRequest { limit: 10, offset: 50 });
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.total, 2);
    }

    #[test]
    fn test_genre_filter_is_case_insensitive_substring() {
        let store = store();
        let page = list_movies(&store, &PageRequest { limit: 10, offset: 0 }, Some("dram"));
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Two Brothers");
        assert_eq!(page.pagination.total, 1);

        let page = list_movies(&store, &PageRequest { limit: 10, offset: 0 }, Some("western"));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 0);
    }

    #[test]
    fn test_get_by_id_for_present_and_absent_ids() {
        let store = store();
        assert_eq!(movie_by_id(&store, 1997).unwrap().title, "Two Brothers");
        assert_eq!(person_by_id(&store, 110756).unwrap().name, "Juuso Hirvikangas");
        assert_eq!(producer_by_id(&store, 3448).unwrap().name, "ITV");

        assert_eq!(
            movie_by_id(&store, 42),
            Err(ApiError::NotFound("Movie with id 42 not found".to_string()))
        );
        assert_eq!(person_by_id(&store, 0).unwrap_err().status(), 404);
        assert_eq!(producer_by_id(&store, 9999).unwrap_err().status(), 404);
    }

    #[test]
    fn test_search_brothers_finds_exactly_two_brothers() {
        let store = store();
        let payload = search(&store, "brothers", SearchScope::All).unwrap();

        assert_eq!(payload.total_results, 1);
        assert_eq!(payload.results.movies.len(), 1);
        assert_eq!(payload.results.movies[0].title, "Two Brothers");
        assert!(payload.results.persons.is_empty());
        assert!(payload.results.producers.is_empty());
    }

    #[test]
    fn test_search_matches_overview_and_country() {
        let store = store();

        // "tigers" only appears in the Two Brothers overview.
        let payload = search(&store, "tigers", SearchScope::All).unwrap();
        assert_eq!(payload.results.movies.len(), 1);

        // "gb" matches ITV's origin country, case-insensitively.
        let payload = search(&store, "gb", SearchScope::All).unwrap();
        assert_eq!(payload.results.producers.len(), 1);
        assert_eq!(payload.results.producers[0].name, "ITV");
    }

    #[test]
    fn test_search_empty_query_is_bad_request() {
        let store = store();
        let err = search(&store, "", SearchScope::All).unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.to_string(), "Search query parameter \"q\" is required");
    }

    #[test]
    fn test_search_scope_restricts_collections() {
        let store = store();

        // "sample" appears in all three collections.
        let all = search(&store, "sample", SearchScope::All).unwrap();
        assert_eq!(all.results.movies.len(), 1);
        assert_eq!(all.results.persons.len(), 1);
        assert_eq!(all.results.producers.len(), 1);
        assert_eq!(all.total_results, 3);

        let only = search(&store, "sample", SearchScope::Only(EntityKind::Persons)).unwrap();
        assert!(only.results.movies.is_empty());
        assert_eq!(only.results.persons.len(), 1);
        assert!(only.results.producers.is_empty());
        assert_eq!(only.total_results, 1);
    }

    #[test]
    fn test_search_unmatched_scope_yields_empty_success() {
        let store = store();
        let payload = search(&store, "sample", SearchScope::Unmatched).unwrap();
        assert_eq!(payload.total_results, 0);
        assert_eq!(payload.results, SearchResults::default());
    }

    #[test]
    fn test_search_scope_from_param() {
        assert_eq!(SearchScope::from_param(None), SearchScope::All);
        assert_eq!(SearchScope::from_param(Some("")), SearchScope::All);
        assert_eq!(
            SearchScope::from_param(Some("movies")),
            SearchScope::Only(EntityKind::Movies)
        );
        assert_eq!(SearchScope::from_param(Some("series")), SearchScope::Unmatched);
    }
}
