/// Row models for the users and movies tables
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored as produced by the configured password storage mode
    pub password: String,
}

/// Movie record in the database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub release_year: i64,
    pub genre: String,
    pub director: String,
    pub rating: String,
    pub duration: i64,
    pub imdb_rating: f64,
}

/// Every mutable movie column, as written by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieFields {
    pub title: String,
    pub release_year: i64,
    pub genre: String,
    pub director: String,
    pub rating: String,
    pub duration: i64,
    pub imdb_rating: f64,
}

impl Movie {
    pub fn from_fields(id: i64, fields: MovieFields) -> Self {
        Self {
            id,
            title: fields.title,
            release_year: fields.release_year,
            genre: fields.genre,
            director: fields.director,
            rating: fields.rating,
            duration: fields.duration,
            imdb_rating: fields.imdb_rating,
        }
    }
}
