//! Identity provider and document store interfaces.
//!
//! # Backends
//!
//! - [`firebase`] - Firebase Authentication and Cloud Firestore over REST
//! - [`memory`] - In-process implementations for local runs and tests
//!
//! Handlers never talk to a backend directly: [`AppState`](crate::state::AppState)
//! holds one `Arc<dyn IdentityProvider>` and one `Arc<dyn DocumentStore>`.

pub mod firebase;
pub mod memory;

pub use firebase::{FirebaseAuthClient, FirestoreClient};
pub use memory::{MemoryDocumentStore, MemoryIdentityProvider};

use core::fmt;

use async_trait::async_trait;
use chatboxt_core::{AccountId, Credentials};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use thiserror::Error;

/// A document body: top-level field names mapped to JSON values.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Signed-in account returned by the identity provider.
///
/// Implements `Debug` manually to redact the ID token.
#[derive(Clone)]
pub struct ProviderSession {
    /// Provider account identifier.
    pub account_id: AccountId,
    /// Email of the account.
    pub email: String,
    /// Short-lived token authorizing document writes and account deletion.
    pub id_token: SecretString,
}

impl fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSession")
            .field("account_id", &self.account_id)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}

/// Acknowledgement of a document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Path of the written document, `{collection}/{id}`.
    pub path: String,
    /// Server timestamp of the write, when the store reports one.
    pub update_time: Option<DateTime<Utc>>,
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the request (wrong password, existing email, ...).
    #[error("{message}")]
    Rejected {
        /// HTTP status code reported by the provider.
        code: u16,
        /// Provider message, e.g. `EMAIL_EXISTS`.
        message: String,
    },

    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be understood.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl ProviderError {
    /// Human-readable message surfaced to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the provider answered with a refusal rather than failing.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write (permissions, quota, ...).
    #[error("{message}")]
    Rejected {
        /// HTTP status code reported by the store.
        code: u16,
        /// Store message.
        message: String,
    },

    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be understood.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// Collection or document ID cannot be used as a path.
    #[error("invalid document path: {0}")]
    InvalidPath(String),
}

impl StoreError {
    /// Human-readable message surfaced to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Account management at the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError>;

    /// Delete the account the session belongs to.
    async fn delete_account(&self, session: &ProviderSession) -> Result<(), ProviderError>;
}

/// Keyed document writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or replace the document `{collection}/{id}`, authorized by `auth`.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        auth: &ProviderSession,
    ) -> Result<Ack, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_is_raw_provider_message() {
        let err = ProviderError::Rejected {
            code: 400,
            message: "EMAIL_EXISTS".to_string(),
        };
        assert_eq!(err.message(), "EMAIL_EXISTS");
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_parse_error_message_is_descriptive() {
        let err = StoreError::Parse("missing name".to_string());
        assert_eq!(err.message(), "unexpected response: missing name");
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = ProviderSession {
            account_id: AccountId::new("uid-1"),
            email: "marie@example.fr".to_string(),
            id_token: SecretString::from("eyJhbGciOiJSUzI1NiJ9.secret"),
        };
        let debug = format!("{session:?}");
        assert!(debug.contains("uid-1"));
        assert!(!debug.contains("eyJhbGci"));
    }
}
