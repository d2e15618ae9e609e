//! Identity resolution for movie identifiers.
//!
//! A public identifier is either a storage-assigned surrogate key (a UUID) or
//! a legacy key carried over from a prior system. The two are told apart by
//! syntactic shape alone: a token that parses as a UUID is only ever looked up
//! as a surrogate key, and anything else is only ever looked up by legacy key.

use std::fmt;

use uuid::Uuid;

/// The resolved form of a public movie identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieKey {
    /// A storage-assigned surrogate key.
    Surrogate(Uuid),
    /// An externally supplied legacy key.
    Legacy(String),
}

impl MovieKey {
    /// Classifies `id` by shape. Never fails: a token that is not a UUID is a
    /// legacy key.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match Uuid::try_parse(id) {
            Ok(uuid) => Self::Surrogate(uuid),
            Err(_) => Self::Legacy(id.to_owned()),
        }
    }
}

impl fmt::Display for MovieKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surrogate(uuid) => write!(f, "{uuid}"),
            Self::Legacy(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_yields_surrogate() {
        let uuid = Uuid::new_v4();

        assert_eq!(
            MovieKey::parse(&uuid.to_string()),
            MovieKey::Surrogate(uuid)
        );
    }

    #[test]
    fn test_parse_numeric_token_yields_legacy() {
        assert_eq!(MovieKey::parse("42"), MovieKey::Legacy("42".to_owned()));
    }

    #[test]
    fn test_parse_near_uuid_yields_legacy() {
        // One character short of a hyphenated UUID.
        let token = "67e55044-10b1-426f-9247-bb680e5fe0c";

        assert_eq!(MovieKey::parse(token), MovieKey::Legacy(token.to_owned()));
    }

    #[test]
    fn test_display_round_trips_original_token() {
        let uuid = Uuid::new_v4();

        assert_eq!(MovieKey::parse("tt0133093").to_string(), "tt0133093");
        assert_eq!(MovieKey::Surrogate(uuid).to_string(), uuid.to_string());
    }
}
