//! Person name type (last name and first name fields).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PersonName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The input is empty or only whitespace.
    #[error("name cannot be empty")]
    Empty,
    /// The input is longer than the allowed number of characters.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// A last name or first name as entered on the signup form.
///
/// Length is counted in characters, not bytes, so accented names are measured
/// the way the user sees them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Maximum length of a name, in characters.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `PersonName` from a string.
    ///
    /// # Errors
    ///
    /// Returns `NameError::Empty` if the input is blank and
    /// `NameError::TooLong` if it exceeds [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        if s.trim().is_empty() {
            return Err(NameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_up_to_twenty_characters() {
        assert!(PersonName::parse("Dupont").is_ok());
        assert!(PersonName::parse(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 20 characters, 40 bytes
        let accented = "é".repeat(20);
        assert!(PersonName::parse(&accented).is_ok());
    }

    #[test]
    fn test_rejects_twenty_one_characters() {
        assert_eq!(
            PersonName::parse(&"a".repeat(21)),
            Err(NameError::TooLong { max: 20 })
        );
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(PersonName::parse(""), Err(NameError::Empty));
        assert_eq!(PersonName::parse("   "), Err(NameError::Empty));
    }
}
