/// Movie store backed by the movies table
use crate::{
    db::models::{Movie, MovieFields},
    error::{ApiError, ApiResult},
};
use sqlx::SqlitePool;

const DUPLICATE_TITLE: &str = "Movie with this title already exists";

const SELECT_MOVIE: &str = "SELECT id, title, release_year, genre, director, rating, duration, imdb_rating FROM movies";

fn not_found() -> ApiError {
    ApiError::NotFound("Movie not found".to_string())
}

/// Map a UNIQUE violation on the title column to a conflict
fn title_conflict(err: sqlx::Error) -> ApiError {
    if ApiError::is_unique_violation(&err) {
        ApiError::Conflict(DUPLICATE_TITLE.to_string())
    } else {
        ApiError::Database(err)
    }
}

/// Movie store service
#[derive(Clone)]
pub struct MovieStore {
    db: SqlitePool,
}

impl MovieStore {
    /// Create a new movie store
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// All movies in ascending id order
    pub async fn list_all(&self) -> ApiResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!("{} ORDER BY id", SELECT_MOVIE))
            .fetch_all(&self.db)
            .await?;

        tracing::debug!("list_all: {} movies", movies.len());
        Ok(movies)
    }

    /// Get a movie by id
    pub async fn get_by_id(&self, id: i64) -> ApiResult<Movie> {
        sqlx::query_as::<_, Movie>(&format!("{} WHERE id = ?1", SELECT_MOVIE))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(not_found)
    }

    /// Find a movie by exact (case-sensitive) title
    pub async fn find_by_title(&self, title: &str) -> ApiResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!("{} WHERE title = ?1", SELECT_MOVIE))
            .bind(title)
            .fetch_optional(&self.db)
            .await?;

        Ok(movie)
    }

    /// Create a movie, rejecting a title that is already taken
    pub async fn create(&self, fields: MovieFields) -> ApiResult<Movie> {
        if self.find_by_title(&fields.title).await?.is_some() {
            tracing::info!("create: duplicate title {:?}", fields.title);
            return Err(ApiError::Conflict(DUPLICATE_TITLE.to_string()));
        }

        // The UNIQUE index settles a race between two creates of one title
        let result = sqlx::query(
            "INSERT INTO movies (title, release_year, genre, director, rating, duration, imdb_rating)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&fields.title)
        .bind(fields.release_year)
        .bind(&fields.genre)
        .bind(&fields.director)
        .bind(&fields.rating)
        .bind(fields.duration)
        .bind(fields.imdb_rating)
        .execute(&self.db)
        .await
        .map_err(title_conflict)?;

        let movie = Movie::from_fields(result.last_insert_rowid(), fields);
        tracing::info!("create: movie {} {:?}", movie.id, movie.title);
        Ok(movie)
    }

    /// Replace every mutable column of a movie
    ///
    /// No title pre-check is made; the UNIQUE constraint still refuses a
    /// title owned by another movie.
    pub async fn update(&self, id: i64, fields: MovieFields) -> ApiResult<Movie> {
        let result = sqlx::query(
            "UPDATE movies
             SET title = ?1, release_year = ?2, genre = ?3, director = ?4,
                 rating = ?5, duration = ?6, imdb_rating = ?7
             WHERE id = ?8",
        )
        .bind(&fields.title)
        .bind(fields.release_year)
        .bind(&fields.genre)
        .bind(&fields.director)
        .bind(&fields.rating)
        .bind(fields.duration)
        .bind(fields.imdb_rating)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(title_conflict)?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        tracing::info!("update: movie {}", id);
        Ok(Movie::from_fields(id, fields))
    }

    /// Delete a movie, then renumber the survivors to 1..=N
    ///
    /// Delete and renumber share one transaction, so readers never observe
    /// a gap and concurrent deletes cannot interleave their renumber passes.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM movies WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM movies ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        // Ascending walk: rank <= old id, and every rank below is already taken
        // by an earlier row, so the target id is always free.
        let mut renumbered = 0;
        for (rank, old_id) in (1..).zip(ids) {
            if rank == old_id {
                continue;
            }
            sqlx::query("UPDATE movies SET id = ?1 WHERE id = ?2")
                .bind(rank)
                .bind(old_id)
                .execute(&mut *tx)
                .await?;
            renumbered += 1;
        }

        tx.commit().await?;

        tracing::info!("delete: movie {}, renumbered {}", id, renumbered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn fields(title: &str) -> MovieFields {
        MovieFields {
            title: title.to_string(),
            release_year: 2010,
            genre: "Sci-Fi".to_string(),
            director: "Nolan".to_string(),
            rating: "PG-13".to_string(),
            duration: 148,
            imdb_rating: 8.8,
        }
    }

    async fn setup_store() -> MovieStore {
        MovieStore::new(test_pool().await)
    }

    #[tokio::test]
    async fn test_first_movie_gets_id_one() {
        let store = setup_store().await;

        let movie = store.create(fields("Inception")).await.unwrap();
        assert_eq!(movie.id, 1);

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![movie]);
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts() {
        let store = setup_store().await;
        store.create(fields("Inception")).await.unwrap();

        match store.create(fields("Inception")).await {
            Err(ApiError::Conflict(msg)) => assert_eq!(msg, "Movie with this title already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_title_comparison_is_case_sensitive() {
        let store = setup_store().await;
        store.create(fields("Inception")).await.unwrap();

        assert!(store.create(fields("inception")).await.is_ok());
        assert!(store.find_by_title("INCEPTION").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let store = setup_store().await;
        assert!(matches!(
            store.get_by_id(999).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let store = setup_store().await;
        let movie = store.create(fields("Inception")).await.unwrap();

        let replacement = MovieFields {
            title: "Tenet".to_string(),
            release_year: 2020,
            genre: "Action".to_string(),
            director: "Christopher Nolan".to_string(),
            rating: "PG-13".to_string(),
            duration: 150,
            imdb_rating: 7.3,
        };
        let updated = store.update(movie.id, replacement.clone()).await.unwrap();

        assert_eq!(updated, Movie::from_fields(movie.id, replacement));
        assert_eq!(store.get_by_id(movie.id).await.unwrap(), updated);
        assert!(store.find_by_title("Inception").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeping_own_title_is_allowed() {
        let store = setup_store().await;
        let movie = store.create(fields("Inception")).await.unwrap();

        let mut same_title = fields("Inception");
        same_title.imdb_rating = 9.0;
        let updated = store.update(movie.id, same_title).await.unwrap();
        assert_eq!(updated.imdb_rating, 9.0);
    }

    #[tokio::test]
    async fn test_update_onto_taken_title_conflicts() {
        let store = setup_store().await;
        store.create(fields("Inception")).await.unwrap();
        let other = store.create(fields("Memento")).await.unwrap();

        assert!(matches!(
            store.update(other.id, fields("Inception")).await,
            Err(ApiError::Conflict(_))
        ));
        assert_eq!(store.get_by_id(other.id).await.unwrap().title, "Memento");
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let store = setup_store().await;
        assert!(matches!(
            store.update(42, fields("Inception")).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_middle_renumbers_densely() {
        let store = setup_store().await;
        store.create(fields("A")).await.unwrap();
        store.create(fields("B")).await.unwrap();
        store.create(fields("C")).await.unwrap();

        store.delete(2).await.unwrap();

        let all = store.list_all().await.unwrap();
        let ids_titles: Vec<(i64, &str)> = all.iter().map(|m| (m.id, m.title.as_str())).collect();
        assert_eq!(ids_titles, vec![(1, "A"), (2, "C")]);
    }

    #[tokio::test]
    async fn test_repeated_deletes_keep_relative_order() {
        let store = setup_store().await;
        for title in ["A", "B", "C", "D", "E", "F"] {
            store.create(fields(title)).await.unwrap();
        }

        store.delete(1).await.unwrap(); // B..F -> 1..5
        store.delete(3).await.unwrap(); // drops D
        store.delete(4).await.unwrap(); // drops F

        let all = store.list_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|m| m.id).collect();
        let titles: Vec<&str> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(titles, vec!["B", "C", "E"]);
    }

    #[tokio::test]
    async fn test_create_after_delete_continues_sequence() {
        let store = setup_store().await;
        store.create(fields("A")).await.unwrap();
        store.create(fields("B")).await.unwrap();
        store.create(fields("C")).await.unwrap();
        store.delete(1).await.unwrap();

        let d = store.create(fields("D")).await.unwrap();
        assert_eq!(d.id, 3);
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_table_untouched() {
        let store = setup_store().await;
        store.create(fields("A")).await.unwrap();
        store.create(fields("B")).await.unwrap();

        assert!(matches!(store.delete(7).await, Err(ApiError::NotFound(_))));

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_last_movie_empties_table() {
        let store = setup_store().await;
        store.create(fields("A")).await.unwrap();
        store.delete(1).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
    }
}
