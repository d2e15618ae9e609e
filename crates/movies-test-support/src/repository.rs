//! Test repositories: `MovieRepository` implementations for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use movies_core::error::DomainError;
use movies_core::identity::MovieKey;
use movies_core::movie::Movie;
use movies_core::ordering::list_order;
use movies_core::repository::MovieRepository;
use uuid::Uuid;

/// A single call observed by [`InMemoryMovieRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    /// `list()`
    List,
    /// `get(id)`
    Get(String),
    /// `create(movie)`, recorded by title.
    Create(String),
    /// `delete(id)`
    Delete(String),
    /// `count()`
    Count,
    /// `bulk_insert_ignoring_duplicates(movies)`, recorded by batch size.
    BulkInsert(usize),
}

#[derive(Debug, Clone)]
struct Row {
    surrogate: Uuid,
    movie: Movie,
}

impl Row {
    fn to_domain(&self) -> Movie {
        let mut movie = self.movie.clone();
        movie.id = match movie.legacy_key() {
            Some(legacy) => legacy.to_owned(),
            None => self.surrogate.to_string(),
        };
        movie
    }

    fn matches(&self, key: &MovieKey) -> bool {
        match key {
            MovieKey::Surrogate(uuid) => self.surrogate == *uuid,
            MovieKey::Legacy(legacy) => self.movie.legacy_key() == Some(legacy.as_str()),
        }
    }
}

/// An in-process repository with the same identity, uniqueness and ordering
/// semantics as the store-backed one. Every call is recorded so tests can
/// assert that no storage access happened.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    rows: Mutex<Vec<Row>>,
    calls: Mutex<Vec<RepositoryCall>>,
    bulk_failure_after: Mutex<Option<usize>>,
}

impl InMemoryMovieRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next bulk insert fail with a non-duplicate error once `n`
    /// items have been inserted by that batch.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_bulk_insert_after(&self, n: usize) {
        *self.bulk_failure_after.lock().unwrap() = Some(n);
    }

    /// Returns a snapshot of every call made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the surrogate key assigned to the movie with `title`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn surrogate_of(&self, title: &str) -> Option<Uuid> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.movie.title == title)
            .map(|row| row.surrogate)
    }

    fn record(&self, call: RepositoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn conflict(rows: &[Row], movie: &Movie) -> Option<String> {
    rows.iter().find_map(|row| {
        if row.movie.title == movie.title && row.movie.year == movie.year {
            Some(format!("title/year ({}, {})", movie.title, movie.year))
        } else if movie.legacy_key().is_some() && row.movie.legacy_key() == movie.legacy_key() {
            Some(format!("legacy_id {}", movie.legacy_key().unwrap_or_default()))
        } else {
            None
        }
    })
}

fn new_row(movie: &Movie) -> Row {
    let mut stored = movie.clone();
    stored.legacy_id = movie.legacy_key().map(str::to_owned);
    Row {
        surrogate: Uuid::new_v4(),
        movie: stored,
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        self.record(RepositoryCall::List);
        let mut movies: Vec<Movie> = self.rows.lock().unwrap().iter().map(Row::to_domain).collect();
        movies.sort_by(list_order);
        Ok(movies)
    }

    async fn get(&self, id: &str) -> Result<Movie, DomainError> {
        self.record(RepositoryCall::Get(id.to_owned()));
        let key = MovieKey::parse(id);
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.matches(&key))
            .map(Row::to_domain)
            .ok_or_else(|| DomainError::NotFound(id.to_owned()))
    }

    async fn create(&self, movie: &Movie) -> Result<Movie, DomainError> {
        self.record(RepositoryCall::Create(movie.title.clone()));
        let mut rows = self.rows.lock().unwrap();
        if let Some(what) = conflict(&rows, movie) {
            return Err(DomainError::DuplicateConflict(what));
        }
        let row = new_row(movie);
        let created = row.to_domain();
        rows.push(row);
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.record(RepositoryCall::Delete(id.to_owned()));
        let key = MovieKey::parse(id);
        let mut rows = self.rows.lock().unwrap();
        match rows.iter().position(|row| row.matches(&key)) {
            Some(index) => {
                rows.remove(index);
                Ok(())
            }
            None => Err(DomainError::NotFound(id.to_owned())),
        }
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.record(RepositoryCall::Count);
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn bulk_insert_ignoring_duplicates(&self, movies: &[Movie]) -> Result<u64, DomainError> {
        self.record(RepositoryCall::BulkInsert(movies.len()));
        let failure_after = self.bulk_failure_after.lock().unwrap().take();
        let mut rows = self.rows.lock().unwrap();
        let mut inserted: usize = 0;
        for movie in movies {
            if failure_after.is_some_and(|n| inserted >= n) {
                return Err(DomainError::BulkInsert {
                    inserted: inserted as u64,
                    reason: "injected write failure".to_owned(),
                });
            }
            if conflict(&rows, movie).is_some() {
                continue;
            }
            rows.push(new_row(movie));
            inserted += 1;
        }
        Ok(inserted as u64)
    }
}

/// A movie repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingMovieRepository;

fn connection_refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl MovieRepository for FailingMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        connection_refused()
    }

    async fn get(&self, _id: &str) -> Result<Movie, DomainError> {
        connection_refused()
    }

    async fn create(&self, _movie: &Movie) -> Result<Movie, DomainError> {
        connection_refused()
    }

    async fn delete(&self, _id: &str) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        connection_refused()
    }

    async fn bulk_insert_ignoring_duplicates(&self, _movies: &[Movie]) -> Result<u64, DomainError> {
        connection_refused()
    }
}

/// A movie repository that waits `delay` before every call, then answers
/// from an empty [`InMemoryMovieRepository`]. Useful for deadline tests.
#[derive(Debug)]
pub struct SlowMovieRepository {
    delay: Duration,
    inner: InMemoryMovieRepository,
}

impl SlowMovieRepository {
    /// Creates a repository that stalls each call for `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: InMemoryMovieRepository::new(),
        }
    }
}

#[async_trait]
impl MovieRepository for SlowMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list().await
    }

    async fn get(&self, id: &str) -> Result<Movie, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(id).await
    }

    async fn create(&self, movie: &Movie) -> Result<Movie, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(movie).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.count().await
    }

    async fn bulk_insert_ignoring_duplicates(&self, movies: &[Movie]) -> Result<u64, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.bulk_insert_ignoring_duplicates(movies).await
    }
}
