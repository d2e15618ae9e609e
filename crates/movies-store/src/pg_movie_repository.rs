//! `PostgreSQL` implementation of the `MovieRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use movies_core::error::DomainError;
use movies_core::identity::MovieKey;
use movies_core::movie::Movie;
use movies_core::ordering::list_order;
use movies_core::repository::MovieRepository;

/// Common SELECT fields for movie queries.
const SELECT_MOVIES: &str = "SELECT id, title, year, legacy_id FROM movies";

const TITLE_YEAR_CONSTRAINT: &str = "movies_title_year_key";

/// PostgreSQL-backed movie repository.
#[derive(Debug, Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    /// Creates a new `PgMovieRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_key(&self, key: &MovieKey) -> Result<Option<MovieRow>, sqlx::Error> {
        match key {
            MovieKey::Surrogate(uuid) => {
                sqlx::query_as::<_, MovieRow>(&format!("{SELECT_MOVIES} WHERE id = $1"))
                    .bind(uuid)
                    .fetch_optional(&self.pool)
                    .await
            }
            MovieKey::Legacy(legacy) => {
                sqlx::query_as::<_, MovieRow>(&format!("{SELECT_MOVIES} WHERE legacy_id = $1"))
                    .bind(legacy)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
    }

    async fn delete_by_key(&self, key: &MovieKey) -> Result<u64, sqlx::Error> {
        let result = match key {
            MovieKey::Surrogate(uuid) => {
                sqlx::query("DELETE FROM movies WHERE id = $1")
                    .bind(uuid)
                    .execute(&self.pool)
                    .await?
            }
            MovieKey::Legacy(legacy) => {
                sqlx::query("DELETE FROM movies WHERE legacy_id = $1")
                    .bind(legacy)
                    .execute(&self.pool)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    year: i32,
    legacy_id: Option<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        let id = match row.legacy_id.as_deref().filter(|id| !id.is_empty()) {
            Some(legacy) => legacy.to_owned(),
            None => row.id.to_string(),
        };
        Self {
            id,
            title: row.title,
            year: row.year,
            legacy_id: row.legacy_id,
        }
    }
}

fn infrastructure(e: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

/// Maps a failed insert, turning unique violations into conflicts.
fn insert_error(e: sqlx::Error, movie: &Movie) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint() == Some(TITLE_YEAR_CONSTRAINT) {
                DomainError::DuplicateConflict(format!(
                    "title/year ({}, {})",
                    movie.title, movie.year
                ))
            } else {
                DomainError::DuplicateConflict(format!(
                    "legacy_id {}",
                    movie.legacy_key().unwrap_or_default()
                ))
            }
        }
        _ => infrastructure(&e),
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        let rows = sqlx::query_as::<_, MovieRow>(SELECT_MOVIES)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;

        // Sorted in process so the order matches `list_order` exactly.
        let mut movies: Vec<Movie> = rows.into_iter().map(Into::into).collect();
        movies.sort_by(list_order);
        Ok(movies)
    }

    async fn get(&self, id: &str) -> Result<Movie, DomainError> {
        let key = MovieKey::parse(id);
        self.fetch_by_key(&key)
            .await
            .map_err(|e| infrastructure(&e))?
            .map(Into::into)
            .ok_or_else(|| DomainError::NotFound(id.to_owned()))
    }

    async fn create(&self, movie: &Movie) -> Result<Movie, DomainError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r"
            INSERT INTO movies (title, year, legacy_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, year, legacy_id
            ",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.legacy_key())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, movie))?;

        debug!(surrogate = %row.id, "movie row inserted");
        Ok(row.into())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let key = MovieKey::parse(id);
        let affected = self
            .delete_by_key(&key)
            .await
            .map_err(|e| infrastructure(&e))?;

        if affected == 0 {
            return Err(DomainError::NotFound(id.to_owned()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn bulk_insert_ignoring_duplicates(&self, movies: &[Movie]) -> Result<u64, DomainError> {
        if movies.is_empty() {
            return Ok(0);
        }

        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        let years: Vec<i32> = movies.iter().map(|m| m.year).collect();
        let legacy_ids: Vec<Option<&str>> = movies.iter().map(Movie::legacy_key).collect();

        // One statement: either every non-conflicting row lands or none does.
        let result = sqlx::query(
            r"
            INSERT INTO movies (title, year, legacy_id)
            SELECT * FROM UNNEST($1::text[], $2::int4[], $3::text[])
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(&titles)
        .bind(&years)
        .bind(&legacy_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::BulkInsert {
            inserted: 0,
            reason: e.to_string(),
        })?;

        let inserted = result.rows_affected();
        debug!(offered = movies.len(), inserted, "bulk insert finished");
        Ok(inserted)
    }
}
