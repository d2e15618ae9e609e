//! Raw seed records as they arrive from a text seed source.
//!
//! Seed files are hand-written and loosely typed: an `id` or `year` may be a
//! string, an integer or a floating-point token. Each field is coerced by an
//! explicit function instead of being inspected dynamically.

use movies_core::movie::Movie;
use serde::Deserialize;

/// A scalar token read from a seed file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawSeedValue {
    /// An integer token.
    Int(i64),
    /// A floating-point token.
    Float(f64),
    /// A string token.
    Str(String),
    /// A boolean token.
    Bool(bool),
}

/// One record of a seed file. Absent and `null` fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSeedMovie {
    /// Identifier from the source system; becomes the legacy id.
    #[serde(default)]
    pub id: Option<RawSeedValue>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// Release year.
    #[serde(default)]
    pub year: Option<RawSeedValue>,
}

/// Coerces a raw `id` to a trimmed string. Absent values become empty.
#[must_use]
pub fn coerce_id(value: Option<&RawSeedValue>) -> String {
    match value {
        None => String::new(),
        Some(RawSeedValue::Str(s)) => s.trim().to_owned(),
        Some(RawSeedValue::Int(n)) => n.to_string(),
        Some(RawSeedValue::Float(f)) => match float_to_integral(*f) {
            Some(n) => n.to_string(),
            None => f.to_string(),
        },
        Some(RawSeedValue::Bool(b)) => b.to_string(),
    }
}

/// Coerces a raw `year` to an integer, best effort. Anything that cannot be
/// read as a year in `i32` range becomes `0`, which the seed filter treats
/// as "no valid year".
#[must_use]
pub fn coerce_year(value: Option<&RawSeedValue>) -> i32 {
    match value {
        None | Some(RawSeedValue::Bool(_)) => 0,
        Some(RawSeedValue::Str(s)) => s.trim().parse().unwrap_or(0),
        Some(RawSeedValue::Int(n)) => i32::try_from(*n).unwrap_or(0),
        Some(RawSeedValue::Float(f)) => float_to_i32(*f).unwrap_or(0),
    }
}

/// Returns `f` as an `i64` when it is finite, integral and in range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Truncates `f` towards zero when the result fits in an `i32`.
#[allow(clippy::cast_possible_truncation)]
fn float_to_i32(f: f64) -> Option<i32> {
    let truncated = f.trunc();
    (truncated.is_finite()
        && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&truncated))
    .then_some(truncated as i32)
}

impl RawSeedMovie {
    /// Converts the raw record into an unpersisted movie.
    #[must_use]
    pub fn into_movie(self) -> Movie {
        let legacy_id = coerce_id(self.id.as_ref());
        let movie = Movie::new(
            self.title.unwrap_or_default().trim(),
            coerce_year(self.year.as_ref()),
        );
        if legacy_id.is_empty() {
            movie
        } else {
            movie.with_legacy_id(legacy_id)
        }
    }
}
