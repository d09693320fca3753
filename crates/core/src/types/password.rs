//! Password policy and strength scoring.
//!
//! A password is accepted only when every [`PasswordCriterion`] holds. The
//! criteria are evaluated independently so a form can list each unmet rule on
//! its own line.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Characters that satisfy [`PasswordCriterion::Special`].
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Minimum password length, in UTF-16 code units as browsers count it.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single password rule.
///
/// Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordCriterion {
    /// At least one ASCII lowercase letter.
    Lowercase,
    /// At least one ASCII uppercase letter.
    Uppercase,
    /// At least one ASCII digit.
    Digit,
    /// At least one character from [`SPECIAL_CHARACTERS`].
    Special,
    /// At least [`MIN_PASSWORD_LENGTH`] characters.
    MinLength,
}

impl PasswordCriterion {
    /// All criteria, in display order.
    pub const ALL: [Self; 5] = [
        Self::Lowercase,
        Self::Uppercase,
        Self::Digit,
        Self::Special,
        Self::MinLength,
    ];

    /// Returns true if `password` satisfies this criterion.
    #[must_use]
    pub fn is_met(self, password: &str) -> bool {
        match self {
            Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
            Self::MinLength => password.encode_utf16().count() >= MIN_PASSWORD_LENGTH,
        }
    }

    /// User-facing description of the rule.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Lowercase => "Contenir au moins une lettre minuscule",
            Self::Uppercase => "Contenir au moins une lettre majuscule",
            Self::Digit => "Contenir au moins un chiffre",
            Self::Special => "Contenir au moins un caractère spécial",
            Self::MinLength => "Avoir une longueur minimale de 8 caractères",
        }
    }

    /// Returns the criteria `password` does not satisfy, in display order.
    #[must_use]
    pub fn unmet(password: &str) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|criterion| !criterion.is_met(password))
            .collect()
    }
}

impl fmt::Display for PasswordCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors that can occur when parsing a [`Password`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The input string is empty.
    #[error("password cannot be empty")]
    Empty,
    /// One or more criteria are not met.
    #[error("password does not meet {} requirement(s)", unmet.len())]
    TooWeak {
        /// The unmet criteria, in display order.
        unmet: Vec<PasswordCriterion>,
    },
}

/// A password that satisfies every [`PasswordCriterion`].
///
/// The value is held in a [`SecretString`] so it is redacted from `Debug`
/// output and zeroized on drop.
#[derive(Debug, Clone)]
pub struct Password(SecretString);

impl Password {
    /// Parse a `Password`, checking it against every criterion.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Empty` for an empty input, otherwise
    /// `PasswordError::TooWeak` listing every unmet criterion.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        if s.is_empty() {
            return Err(PasswordError::Empty);
        }

        let unmet = PasswordCriterion::unmet(s);
        if !unmet.is_empty() {
            return Err(PasswordError::TooWeak { unmet });
        }

        Ok(Self(SecretString::from(s)))
    }

    /// Returns the password text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Consumes the password and returns the underlying secret.
    #[must_use]
    pub fn into_secret(self) -> SecretString {
        self.0
    }
}

/// Password strength indicator shown under the signup password field.
///
/// The score is the number of satisfied criteria minus one, so a password that
/// meets every rule is [`PasswordStrength::VeryStrong`] and one that meets at
/// most one rule is [`PasswordStrength::VeryWeak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PasswordStrength {
    /// Score 0.
    #[default]
    VeryWeak,
    /// Score 1.
    Weak,
    /// Score 2.
    Medium,
    /// Score 3.
    Strong,
    /// Score 4.
    VeryStrong,
}

impl PasswordStrength {
    /// Score a password.
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        let met = PasswordCriterion::ALL
            .into_iter()
            .filter(|criterion| criterion.is_met(password))
            .count();

        match met.saturating_sub(1) {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Medium,
            3 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    /// Numeric score, 0 through 4.
    #[must_use]
    pub const fn score(self) -> u8 {
        self as u8
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryWeak => "Très faible",
            Self::Weak => "Faible",
            Self::Medium => "Moyen",
            Self::Strong => "Fort",
            Self::VeryStrong => "Très fort",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_password_meeting_all_criteria() {
        for candidate in ["Abcdef1!", "Sup3r-Secret", "P@ssw0rdP@ssw0rd", "xY9?xY9?"] {
            assert!(Password::parse(candidate).is_ok(), "{candidate} should pass");
        }
    }

    #[test]
    fn test_each_missing_criterion_is_reported_alone() {
        let cases = [
            ("ABCDEF1!", PasswordCriterion::Lowercase),
            ("abcdef1!", PasswordCriterion::Uppercase),
            ("Abcdefg!", PasswordCriterion::Digit),
            ("Abcdefg1", PasswordCriterion::Special),
            ("Abc1!", PasswordCriterion::MinLength),
        ];

        for (candidate, missing) in cases {
            assert_eq!(
                Password::parse(candidate).unwrap_err(),
                PasswordError::TooWeak {
                    unmet: vec![missing]
                },
                "{candidate}"
            );
        }
    }

    #[test]
    fn test_multiple_unmet_criteria_keep_display_order() {
        assert_eq!(
            PasswordCriterion::unmet("abc"),
            vec![
                PasswordCriterion::Uppercase,
                PasswordCriterion::Digit,
                PasswordCriterion::Special,
                PasswordCriterion::MinLength,
            ]
        );
    }

    #[test]
    fn test_every_special_character_counts() {
        for c in SPECIAL_CHARACTERS.chars() {
            assert!(
                PasswordCriterion::Special.is_met(&c.to_string()),
                "{c} should count as special"
            );
        }
        assert!(!PasswordCriterion::Special.is_met("~`€ "));
    }

    #[test]
    fn test_letters_and_digits_are_ascii_only() {
        assert!(!PasswordCriterion::Lowercase.is_met("é"));
        assert!(!PasswordCriterion::Uppercase.is_met("É"));
        assert!(!PasswordCriterion::Digit.is_met("٣"));
    }

    #[test]
    fn test_length_counts_utf16_units() {
        assert!(PasswordCriterion::MinLength.is_met("éééééééé"));
        assert!(!PasswordCriterion::MinLength.is_met("ééééééé"));
        // Each emoji is a surrogate pair
        assert!(PasswordCriterion::MinLength.is_met("Ab1!😀😀"));
        assert!(!PasswordCriterion::MinLength.is_met("Ab1!😀"));
        assert!(Password::parse("Ab1!😀😀").is_ok());
    }

    #[test]
    fn test_empty_password() {
        assert!(matches!(Password::parse(""), Err(PasswordError::Empty)));
    }

    #[test]
    fn test_debug_does_not_leak() {
        let password = Password::parse("Abcdef1!").unwrap();
        assert!(!format!("{password:?}").contains("Abcdef1!"));
        assert_eq!(password.expose(), "Abcdef1!");
    }

    #[test]
    fn test_strength_scores() {
        assert_eq!(PasswordStrength::evaluate(""), PasswordStrength::VeryWeak);
        assert_eq!(PasswordStrength::evaluate("a"), PasswordStrength::VeryWeak);
        assert_eq!(PasswordStrength::evaluate("aA"), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::evaluate("aA1"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::evaluate("aA1!"), PasswordStrength::Strong);
        assert_eq!(
            PasswordStrength::evaluate("aA1!aA1!"),
            PasswordStrength::VeryStrong
        );
    }

    #[test]
    fn test_strength_labels() {
        assert_eq!(PasswordStrength::VeryWeak.label(), "Très faible");
        assert_eq!(PasswordStrength::Weak.label(), "Faible");
        assert_eq!(PasswordStrength::Medium.label(), "Moyen");
        assert_eq!(PasswordStrength::Strong.label(), "Fort");
        assert_eq!(PasswordStrength::VeryStrong.label(), "Très fort");
        assert_eq!(PasswordStrength::VeryStrong.score(), 4);
    }
}
