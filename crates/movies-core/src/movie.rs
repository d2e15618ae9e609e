//! The movie entity and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Earliest accepted release year (the first motion picture, 1878).
pub const MIN_YEAR: i32 = 1878;

/// Latest accepted release year.
pub const MAX_YEAR: i32 = 3000;

/// A movie record.
///
/// `legacy_id` carries an identifier migrated from a previous system. It is
/// never serialized outward; when present it is also the public `id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Movie {
    /// Public identifier. Empty until the record has been persisted.
    #[serde(default)]
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Identifier carried over from a prior system.
    #[serde(skip)]
    pub legacy_id: Option<String>,
}

impl Movie {
    /// Creates an unpersisted movie without a legacy identifier.
    #[must_use]
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            year,
            legacy_id: None,
        }
    }

    /// Attaches a legacy identifier.
    #[must_use]
    pub fn with_legacy_id(mut self, legacy_id: impl Into<String>) -> Self {
        self.legacy_id = Some(legacy_id.into());
        self
    }

    /// Returns the legacy identifier when one is set and non-empty.
    #[must_use]
    pub fn legacy_key(&self) -> Option<&str> {
        self.legacy_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Trims surrounding whitespace from the title and legacy identifier.
    /// An empty legacy identifier becomes `None`.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_owned();
        self.legacy_id = self
            .legacy_id
            .take()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty());
    }

    /// Checks the entity invariants. Call after [`Movie::normalize`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is blank or the year is
    /// outside `[MIN_YEAR, MAX_YEAR]`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_owned()));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(DomainError::Validation(format!(
                "year {} is out of range [{MIN_YEAR}, {MAX_YEAR}]",
                self.year
            )));
        }
        Ok(())
    }
}
