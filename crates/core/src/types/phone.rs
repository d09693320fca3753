//! French phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `+33` or a leading `0`, then a non-zero digit and eight more digits.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+33|0)[1-9][0-9]{8}$").expect("phone pattern is a valid regex")
});

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a French national or international number.
    #[error("phone number must be +33 or 0 followed by 9 digits")]
    InvalidFormat,
}

/// A French phone number, in national (`0612345678`) or international
/// (`+33612345678`) form.
///
/// The number is stored exactly as entered; no reformatting takes place.
///
/// ```
/// use chatboxt_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+33612345678").is_ok());
/// assert!(PhoneNumber::parse("0612345678").is_ok());
/// assert!(PhoneNumber::parse("0012345678").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::Empty` for an empty input and
    /// `PhoneError::InvalidFormat` when the input is not `+33`/`0` followed by
    /// a non-zero digit and eight digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !PHONE_PATTERN.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the number uses the `+33` prefix.
    #[must_use]
    pub fn is_international(&self) -> bool {
        self.0.starts_with("+33")
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_national_and_international() {
        assert!(PhoneNumber::parse("0612345678").is_ok());
        assert!(PhoneNumber::parse("+33612345678").is_ok());
        assert!(PhoneNumber::parse("0187654321").is_ok());
    }

    #[test]
    fn test_rejects_zero_after_prefix() {
        assert_eq!(
            PhoneNumber::parse("0012345678"),
            Err(PhoneError::InvalidFormat)
        );
        assert_eq!(
            PhoneNumber::parse("+33012345678"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        assert_eq!(PhoneNumber::parse("0612345"), Err(PhoneError::InvalidFormat));
        assert_eq!(PhoneNumber::parse("1234567"), Err(PhoneError::InvalidFormat));
        assert_eq!(
            PhoneNumber::parse("06123456789"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_rejects_separators_and_other_prefixes() {
        assert!(PhoneNumber::parse("06 12 34 56 78").is_err());
        assert!(PhoneNumber::parse("06.12.34.56.78").is_err());
        assert!(PhoneNumber::parse("+32612345678").is_err());
        assert!(PhoneNumber::parse("0033612345678").is_err());
    }

    #[test]
    fn test_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_is_international() {
        assert!(PhoneNumber::parse("+33612345678").unwrap().is_international());
        assert!(!PhoneNumber::parse("0612345678").unwrap().is_international());
    }
}
