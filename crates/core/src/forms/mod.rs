//! Form models for the login and signup screens.
//!
//! Every field moves through a small state machine:
//!
//! ```text
//! Untouched --change/blur--> Valid | Invalid(error)
//! Valid     --change/blur--> Valid | Invalid(error)
//! Invalid   --change/blur--> Valid | Invalid(error)
//! ```
//!
//! A form is [`FormStatus::Ready`] only when every field is `Valid`; an
//! untouched field keeps the form `Blocked`. Submitting validates every field
//! first, so untouched fields are reported rather than skipped.

pub mod login;
pub mod signup;

pub use login::{LoginField, LoginForm, LoginValues};
pub use signup::{
    PASSWORD_RULES_HEADER, SignupField, SignupForm, SignupValues, SubmitBlocked, UnknownField,
    ValidatedSignup, checkbox_checked,
};

use thiserror::Error;

use crate::types::{EmailError, NameError, PasswordError, PhoneError};

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is required but empty.
    #[error("field is required")]
    Required,
    /// Name too long.
    #[error(transparent)]
    Name(#[from] NameError),
    /// Email does not match the accepted pattern.
    #[error(transparent)]
    Email(#[from] EmailError),
    /// Phone number does not match the accepted pattern.
    #[error(transparent)]
    Phone(#[from] PhoneError),
    /// Password misses one or more criteria.
    #[error(transparent)]
    Password(#[from] PasswordError),
    /// Confirmation differs from the password.
    #[error("passwords do not match")]
    Mismatch,
    /// Terms checkbox left unchecked.
    #[error("terms must be accepted")]
    TermsNotAccepted,
}

/// Validation state of one form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Not yet changed, blurred or submitted.
    #[default]
    Untouched,
    /// Passed validation.
    Valid,
    /// Failed validation.
    Invalid(FieldError),
}

impl FieldState {
    /// Build a state from a validation result.
    pub fn from_result<T, E: Into<FieldError>>(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(e) => Self::Invalid(e.into()),
        }
    }

    /// Returns true if the field passed validation.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the validation error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&FieldError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::Untouched | Self::Valid => None,
        }
    }
}

/// Aggregate status of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    /// Every field is valid; the form may be submitted.
    Ready,
    /// At least one field is untouched or invalid.
    Blocked,
}

impl FormStatus {
    /// Aggregate field states into a form status.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a FieldState>) -> Self {
        if states.into_iter().all(FieldState::is_valid) {
            Self::Ready
        } else {
            Self::Blocked
        }
    }

    /// Returns true if the form may be submitted.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}
