//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use movies_core::event::EventSubjects;

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `PostgreSQL` connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Bind address (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`PORT`, default `3000`).
    pub port: u16,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`, default `10`).
    pub database_max_connections: u32,
    /// Seed file applied at startup (`SEED_FILE`, optional).
    pub seed_file: Option<PathBuf>,
    /// Whether lifecycle events are published (`EVENTS_ENABLED`, default `false`).
    pub events_enabled: bool,
    /// Subjects for lifecycle events (`EVENTS_SUBJECT_CREATED`,
    /// `EVENTS_SUBJECT_DELETED`).
    pub event_subjects: EventSubjects,
    /// Per-request and startup-seed deadline (`REQUEST_TIMEOUT_SECS`, default `10`).
    pub request_timeout: Duration,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".to_owned())
        })?;

        let defaults = EventSubjects::default();
        let event_subjects = EventSubjects {
            created: var("EVENTS_SUBJECT_CREATED").unwrap_or(defaults.created),
            deleted: var("EVENTS_SUBJECT_DELETED").unwrap_or(defaults.deleted),
        };

        Ok(Self {
            database_url,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or("PORT", var("PORT"), 3000)?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            seed_file: var("SEED_FILE").map(PathBuf::from),
            events_enabled: match var("EVENTS_ENABLED") {
                Some(raw) => parse_flag("EVENTS_ENABLED", &raw)?,
                None => false,
            },
            event_subjects,
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                10,
            )?),
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}
