//! Deterministic listing order for movies.
//!
//! Movies with a legacy identifier come first, ordered by that identifier
//! with numeric-aware comparison ("8" before "10"). Movies without one follow.
//! Ties are broken by title, then year. Every repository sorts its listing
//! with [`list_order`], so no variant depends on a store-specific collation.

use std::cmp::Ordering;

use crate::movie::Movie;

/// Compares two strings treating runs of ASCII digits as numbers.
///
/// Digit runs compare by numeric value (leading zeros ignored, then the
/// shorter zero-padded form first); all other characters compare by code
/// point.
#[must_use]
pub fn numeric_aware_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a;
    let mut right = b;

    loop {
        let (Some(lc), Some(rc)) = (left.chars().next(), right.chars().next()) else {
            // At least one side is exhausted; the shorter remainder sorts first.
            return left.len().cmp(&right.len());
        };

        if lc.is_ascii_digit() && rc.is_ascii_digit() {
            let (l_run, l_rest) = split_digits(left);
            let (r_run, r_rest) = split_digits(right);
            let ord = compare_digit_runs(l_run, r_run);
            if ord != Ordering::Equal {
                return ord;
            }
            left = l_rest;
            right = r_rest;
        } else if lc != rc {
            return lc.cmp(&rc);
        } else {
            left = &left[lc.len_utf8()..];
            right = &right[rc.len_utf8()..];
        }
    }
}

/// Orders two movies for listing. See the module documentation.
#[must_use]
pub fn list_order(a: &Movie, b: &Movie) -> Ordering {
    let by_legacy = match (a.legacy_key(), b.legacy_key()) {
        (Some(l), Some(r)) => numeric_aware_cmp(l, r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_legacy
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.year.cmp(&b.year))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l_trimmed = l.trim_start_matches('0');
    let r_trimmed = r.trim_start_matches('0');
    l_trimmed
        .len()
        .cmp(&r_trimmed.len())
        .then_with(|| l_trimmed.cmp(r_trimmed))
        .then_with(|| l.len().cmp(&r.len()))
}
