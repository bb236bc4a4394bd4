//! In-memory record store.
//!
//! Holds the three collections. A store is built once, at startup,
//! either from the built-in sample data or from the loader, and is
//! never mutated afterwards; readers share it via `Arc`.

use crate::models::{ActingRole, CrewRole, EntityKind, Movie, Person, Producer};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

/// Immutable holder of the three record collections.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    movies: Vec<Movie>,
    persons: Vec<Person>,
    producers: Vec<Producer>,
}

impl RecordStore {
    /// Build a store from already-parsed collections.
    ///
    /// Ids are expected to be unique within each collection; duplicates
    /// are reported with a warning and kept as-is (lookups return the
    /// first match).
    pub fn new(movies: Vec<Movie>, persons: Vec<Person>, producers: Vec<Producer>) -> Self {
        let store = Self {
            movies,
            persons,
            producers,
        };
        for kind in EntityKind::ALL {
            let duplicates = store.duplicate_ids(kind);
            if !duplicates.is_empty() {
                warn!(
                    collection = kind.as_str(),
                    duplicates = ?duplicates,
                    "Duplicate record ids in collection"
                );
            }
        }
        store
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// Record count for one collection.
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Movies => self.movies.len(),
            EntityKind::Persons => self.persons.len(),
            EntityKind::Producers => self.producers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Record count across all three collections.
    pub fn total_records(&self) -> usize {
        self.movies.len() + self.persons.len() + self.producers.len()
    }

    fn duplicate_ids(&self, kind: EntityKind) -> Vec<u64> {
        let ids: Vec<u64> = match kind {
            EntityKind::Movies => self.movies.iter().map(|m| m.id).collect(),
            EntityKind::Persons => self.persons.iter().map(|p| p.id).collect(),
            EntityKind::Producers => self.producers.iter().map(|p| p.id).collect(),
        };
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in ids {
            if !seen.insert(id) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// The built-in sample data set: two movies, two persons, two
    /// production companies.
    pub fn sample() -> Self {
        Self::new(sample_movies(), sample_persons(), sample_producers())
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn sample_movies() -> Vec<Movie> {
    vec![
        Movie {
            id: 1997,
            title: "Two Brothers".to_string(),
            overview: "Two tigers are separated as cubs and taken into captivity, only to be \
                       reunited years later as enemies by an explorer (Pearce) who inadvertently \
                       forces them to fight each other."
                .to_string(),
            release_date: date(2004, 4, 7),
            runtime: 109,
            genres: vec![
                "Adventure".to_string(),
                "Drama".to_string(),
                "Family".to_string(),
            ],
            spoken_languages: vec![
                "English".to_string(),
                "French".to_string(),
                "Thai".to_string(),
            ],
            poster_url: "https://image.tmdb.org/t/p/w500/5I2pRuJI3SZVsxP5iaorGaczzkI.jpg"
                .to_string(),
            backdrop_url: "https://image.tmdb.org/t/p/w780/aB5123I8MNi3NIg0t9RrP6A7Yla.jpg"
                .to_string(),
            cast_ids: vec![529, 13687, 1281, 20527, 20530],
            crew_ids: vec![2358, 17063, 2352, 2359, 469],
            production_company_ids: vec![866, 116231, 356],
            trailer_url: "https://www.youtube.com/watch?v=xvRZIAwkTvQ".to_string(),
            imdb_rating: 7.103,
            vote_count: 836,
            seo_title: "Two Brothers: Cast, Crew, Production, Box-Office - TimesEntertain"
                .to_string(),
            seo_description: "Two Brothers: Two tigers are separated as cubs and taken into \
                              captivity, only to be reunited years later as enemies by an \
                              explorer (Pearce) who inadvertently forces them to fight each \
                              other."
                .to_string(),
            seo_focus_keywords: "Two Brothers,Adventure,Drama,Family,Two Brothers in English,\
                                 Two Brothers in French,Two Brothers in Thai"
                .to_string(),
        },
        Movie {
            id: 1998,
            title: "Sample Movie 2".to_string(),
            overview: "Another sample movie for demonstration.".to_string(),
            release_date: date(2005, 5, 15),
            runtime: 120,
            genres: vec!["Action".to_string(), "Thriller".to_string()],
            spoken_languages: vec!["English".to_string()],
            poster_url: "https://via.placeholder.com/500x750/1FB8CD/FFFFFF?text=Movie+2"
                .to_string(),
            backdrop_url: "https://via.placeholder.com/780x439/5D878F/FFFFFF?text=Movie+2+Backdrop"
                .to_string(),
            cast_ids: vec![110756],
            crew_ids: vec![110756],
            production_company_ids: vec![3448],
            trailer_url: "https://www.youtube.com/watch?v=sample".to_string(),
            imdb_rating: 6.5,
            vote_count: 425,
            seo_title: "Sample Movie 2: Action Thriller".to_string(),
            seo_description: "An action-packed thriller for demonstration purposes.".to_string(),
            seo_focus_keywords: "Sample,Action,Thriller,Movie".to_string(),
        },
    ]
}

fn sample_persons() -> Vec<Person> {
    vec![
        Person {
            id: 110756,
            name: "Juuso Hirvikangas".to_string(),
            profile_url: "https://image.tmdb.org/t/p/w300/7rvAPTsfz9U2E5tYghfY8YQlZ94.jpg"
                .to_string(),
            roles: vec![ActingRole {
                movie_id: 2,
                character: "Man in Harbour (uncredited)".to_string(),
            }],
            crew_roles: vec![
                CrewRole {
                    movie_id: 2,
                    job: "Gaffer".to_string(),
                    department: "Lighting".to_string(),
                },
                CrewRole {
                    movie_id: 3,
                    job: "Sound Assistant".to_string(),
                    department: "Sound".to_string(),
                },
            ],
        },
        Person {
            id: 110757,
            name: "Sample Actor".to_string(),
            profile_url: "https://via.placeholder.com/300x450/FFC185/000000?text=Sample+Actor"
                .to_string(),
            roles: vec![ActingRole {
                movie_id: 1997,
                character: "Leading Role".to_string(),
            }],
            crew_roles: vec![],
        },
    ]
}

fn sample_producers() -> Vec<Producer> {
    vec![
        Producer {
            id: 3448,
            name: "ITV".to_string(),
            origin_country: "GB".to_string(),
            logo_url: "https://image.tmdb.org/t/p/w300/dcA8JDfnnQPMaq8lv2CCiYrNe0S.png"
                .to_string(),
        },
        Producer {
            id: 3449,
            name: "Sample Productions".to_string(),
            origin_country: "US".to_string(),
            logo_url: "https://via.placeholder.com/300x200/B4413C/FFFFFF?text=Sample+Productions"
                .to_string(),
        },
    ]
}
