//! Entity types for the three record collections.
//!
//! Records are flat: cross-collection id references (`cast_ids`,
//! `movie_id` inside roles, ...) are carried as opaque numbers and are
//! never resolved or validated against the other collections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique id within the movies collection
    pub id: u64,
    pub title: String,
    /// Plot summary text
    pub overview: String,
    /// Theatrical release date
    pub release_date: NaiveDate,
    /// Runtime in minutes
    pub runtime: u32,
    /// Genre labels, free-form strings
    pub genres: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    /// Ids of cast members in the persons collection (unvalidated)
    pub cast_ids: Vec<u64>,
    /// Ids of crew members in the persons collection (unvalidated)
    pub crew_ids: Vec<u64>,
    /// Ids in the producers collection (unvalidated)
    pub production_company_ids: Vec<u64>,
    pub trailer_url: String,
    /// Aggregate rating, 0.0 - 10.0
    pub imdb_rating: f64,
    pub vote_count: u64,
    pub seo_title: String,
    pub seo_description: String,
    /// Comma-separated keyword list
    pub seo_focus_keywords: String,
}

/// A person record covering both cast and crew.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Unique id within the persons collection
    pub id: u64,
    pub name: String,
    pub profile_url: String,
    /// Acting credits
    #[serde(default)]
    pub roles: Vec<ActingRole>,
    /// Behind-the-camera credits
    #[serde(default)]
    pub crew_roles: Vec<CrewRole>,
}

/// One acting credit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActingRole {
    /// Id of the movie (unvalidated)
    pub movie_id: u64,
    /// Character name as credited
    pub character: String,
}

/// One crew credit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewRole {
    /// Id of the movie (unvalidated)
    pub movie_id: u64,
    pub job: String,
    pub department: String,
}

/// A production-company record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Producer {
    /// Unique id within the producers collection
    pub id: u64,
    pub name: String,
    /// ISO 3166-1 alpha-2 country code
    pub origin_country: String,
    pub logo_url: String,
}

/// One of the three record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movies,
    Persons,
    Producers,
}

impl EntityKind {
    /// All collections, in canonical order.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Movies,
        EntityKind::Persons,
        EntityKind::Producers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movies => "movies",
            EntityKind::Persons => "persons",
            EntityKind::Producers => "producers",
        }
    }

    /// Parse an endpoint/type name. Returns `None` for anything that is
    /// not one of the three collection names.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movies" => Some(EntityKind::Movies),
            "persons" => Some(EntityKind::Persons),
            "producers" => Some(EntityKind::Producers),
            _ => None,
        }
    }

    /// Singular label used in error messages ("Movie with id 7 not found").
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Movies => "Movie",
            EntityKind::Persons => "Person",
            EntityKind::Producers => "Producer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_parse_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("series"), None);
        assert_eq!(EntityKind::parse(""), None);
    }

    #[test]
    fn test_deserialize_movie() {
        let json = r#"{
            "id": 1997,
            "title": "Two Brothers",
            "overview": "Two tigers are separated as cubs.",
            "release_date": "2004-04-07",
            "runtime": 109,
            "genres": ["Adventure", "Drama", "Family"],
            "spoken_languages": ["English", "French", "Thai"],
            "poster_url": "https://image.tmdb.org/t/p/w500/poster.jpg",
            "backdrop_url": "https://image.tmdb.org/t/p/w780/backdrop.jpg",
            "cast_ids": [529, 13687],
            "crew_ids": [2358],
            "production_company_ids": [866],
            "trailer_url": "https://www.youtube.com/watch?v=xvRZIAwkTvQ",
            "imdb_rating": 7.103,
            "vote_count": 836,
            "seo_title": "Two Brothers: Cast, Crew",
            "seo_description": "Two Brothers: Two tigers are separated as cubs.",
            "seo_focus_keywords": "Two Brothers,Adventure,Drama"
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 1997);
        assert_eq!(movie.genres.len(), 3);
        assert_eq!(movie.release_date.to_string(), "2004-04-07");
    }

    #[test]
    fn test_deserialize_person_with_missing_role_lists() {
        let json = r#"{
            "id": 110757,
            "name": "Sample Actor",
            "profile_url": "https://example.com/profile.jpg"
        }"#;

        let person: Person = serde_json::from_str(json).unwrap();
        assert!(person.roles.is_empty());
        assert!(person.crew_roles.is_empty());
    }
}
