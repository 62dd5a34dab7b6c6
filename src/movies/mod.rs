/// Movie catalogue
///
/// Request shapes for movie writes and the store that owns the movies table.

mod store;

pub use store::MovieStore;

use crate::{
    db::models::{Movie, MovieFields},
    error::{ApiError, ApiResult},
};
use serde::{Deserialize, Serialize};

/// Movie write request (create or full replacement)
///
/// Every field is optional at the wire level so that an absent key is
/// reported by name instead of as a generic decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub release_year: Option<i64>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<i64>,
    pub imdb_rating: Option<f64>,
}

fn required<T>(value: Option<T>, name: &'static str) -> ApiResult<T> {
    value.ok_or(ApiError::MissingField(name))
}

impl MovieRequest {
    /// Check that every field is present, in column order
    pub fn into_fields(self) -> ApiResult<MovieFields> {
        Ok(MovieFields {
            title: required(self.title, "title")?,
            release_year: required(self.release_year, "release_year")?,
            genre: required(self.genre, "genre")?,
            director: required(self.director, "director")?,
            rating: required(self.rating, "rating")?,
            duration: required(self.duration, "duration")?,
            imdb_rating: required(self.imdb_rating, "imdb_rating")?,
        })
    }
}

/// List response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> MovieRequest {
        MovieRequest {
            title: Some("Inception".to_string()),
            release_year: Some(2010),
            genre: Some("Sci-Fi".to_string()),
            director: Some("Nolan".to_string()),
            rating: Some("PG-13".to_string()),
            duration: Some(148),
            imdb_rating: Some(8.8),
        }
    }

    #[test]
    fn test_complete_request_converts() {
        let fields = full_request().into_fields().unwrap();
        assert_eq!(fields.title, "Inception");
        assert_eq!(fields.duration, 148);
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let mut req = full_request();
        req.genre = None;
        req.imdb_rating = None;

        match req.into_fields() {
            Err(ApiError::MissingField(name)) => assert_eq!(name, "genre"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let req: MovieRequest = serde_json::from_value(serde_json::json!({
            "title": null,
            "release_year": 2010
        }))
        .unwrap();

        assert!(matches!(req.into_fields(), Err(ApiError::MissingField("title"))));
    }
}
