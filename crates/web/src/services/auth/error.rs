//! Authentication error types.

use thiserror::Error;

use crate::identity::{ProviderError, StoreError};

/// Message shown when a signup for the same email is already running.
pub const SIGNUP_IN_PROGRESS_MESSAGE: &str = "Inscription déjà en cours";

/// Errors that can occur during login or signup.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider refused or failed the request.
    #[error("identity provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The account was created but its profile could not be written.
    ///
    /// `rollback` holds the error from the compensating account deletion, if
    /// that failed too.
    #[error("profile not saved: {source}")]
    ProfileNotSaved {
        source: StoreError,
        rollback: Option<ProviderError>,
    },

    /// The profile could not be turned into a document.
    #[error("could not encode profile: {0}")]
    Encode(#[from] serde_json::Error),

    /// A signup for the same email is already in flight.
    #[error("a signup for this email is already in progress")]
    SubmissionInProgress,
}

impl AuthError {
    /// Message shown to the user, without any prefix.
    ///
    /// Provider and store rejections are passed through unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(e) => e.message(),
            Self::ProfileNotSaved { source, .. } => source.message(),
            Self::Encode(_) => "Erreur interne".to_string(),
            Self::SubmissionInProgress => SIGNUP_IN_PROGRESS_MESSAGE.to_string(),
        }
    }

    /// Whether the error needs operator attention rather than user correction.
    ///
    /// True when an account may have been left without a profile, when the
    /// profile could not be encoded, and when the provider could not be
    /// reached at all.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Provider(e) => !e.is_rejection(),
            Self::ProfileNotSaved { rollback, .. } => rollback.is_some(),
            Self::Encode(_) => true,
            Self::SubmissionInProgress => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AuthError::Provider(ProviderError::Rejected {
            code: 400,
            message: "EMAIL_EXISTS".to_string(),
        });
        assert_eq!(err.user_message(), "EMAIL_EXISTS");
        assert!(!err.is_server_error());

        let err = AuthError::ProfileNotSaved {
            source: StoreError::Rejected {
                code: 403,
                message: "Missing or insufficient permissions.".to_string(),
            },
            rollback: None,
        };
        assert_eq!(err.user_message(), "Missing or insufficient permissions.");
        assert!(!err.is_server_error());

        assert_eq!(
            AuthError::SubmissionInProgress.user_message(),
            "Inscription déjà en cours"
        );
    }

    #[test]
    fn test_failed_rollback_is_server_error() {
        let err = AuthError::ProfileNotSaved {
            source: StoreError::Parse("truncated".to_string()),
            rollback: Some(ProviderError::Rejected {
                code: 400,
                message: "TOKEN_EXPIRED".to_string(),
            }),
        };
        assert!(err.is_server_error());
        assert_eq!(err.user_message(), "unexpected response: truncated");
    }
}
