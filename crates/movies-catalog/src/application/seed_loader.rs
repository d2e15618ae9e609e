//! Loads seed files into unpersisted movies.
//!
//! JSON is the default format; files ending in `.yaml` or `.yml` are read as
//! YAML. Both decode into the same [`RawSeedMovie`] records.

use std::path::Path;

use movies_core::movie::Movie;
use thiserror::Error;
use tracing::debug;

use crate::domain::seed_record::RawSeedMovie;

/// Errors raised while reading a seed source.
#[derive(Debug, Error)]
pub enum SeedLoadError {
    /// The seed file could not be read.
    #[error("read seed {path}: {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The seed file is not a JSON array of records.
    #[error("unmarshal seed: {0}")]
    Json(#[from] serde_json::Error),

    /// The seed file is not a YAML sequence of records.
    #[error("unmarshal seed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parses a JSON array of raw seed records.
///
/// # Errors
///
/// Returns `SeedLoadError::Json` if `input` is not a JSON array of objects.
pub fn parse_seed_json(input: &str) -> Result<Vec<Movie>, SeedLoadError> {
    let raws: Vec<RawSeedMovie> = serde_json::from_str(input)?;
    Ok(raws.into_iter().map(RawSeedMovie::into_movie).collect())
}

/// Parses a YAML sequence of raw seed records.
///
/// # Errors
///
/// Returns `SeedLoadError::Yaml` if `input` is not a YAML sequence of maps.
pub fn parse_seed_yaml(input: &str) -> Result<Vec<Movie>, SeedLoadError> {
    let raws: Vec<RawSeedMovie> = serde_yaml::from_str(input)?;
    Ok(raws.into_iter().map(RawSeedMovie::into_movie).collect())
}

/// Reads and parses the seed file at `path`.
///
/// # Errors
///
/// Returns `SeedLoadError::Io` if the file cannot be read, or a parse error
/// if its contents are malformed.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<Vec<Movie>, SeedLoadError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let movies = if is_yaml {
        parse_seed_yaml(&contents)?
    } else {
        parse_seed_json(&contents)?
    };
    debug!(path = %path.display(), records = movies.len(), "loaded seed file");
    Ok(movies)
}
