//! Authentication service.
//!
//! Login is a single identity provider call. Signup is one logical
//! transaction over two systems:
//!
//! 1. create the account at the identity provider
//! 2. write the profile to `users/{accountId}` in the document store
//!
//! If step 2 fails the account created in step 1 is deleted again, so no
//! account is left without its profile.

mod error;
mod in_flight;

pub use error::{AuthError, SIGNUP_IN_PROGRESS_MESSAGE};
pub use in_flight::InFlightSignups;

use chatboxt_core::{Credentials, ProfileRecord, ValidatedSignup};

use crate::identity::{Document, DocumentStore, IdentityProvider, ProviderSession};

/// Collection holding one profile document per account.
pub const USERS_COLLECTION: &str = "users";

/// Authentication service.
pub struct AuthService<'a> {
    identity: &'a dyn IdentityProvider,
    documents: &'a dyn DocumentStore,
    in_flight: &'a InFlightSignups,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        identity: &'a dyn IdentityProvider,
        documents: &'a dyn DocumentStore,
        in_flight: &'a InFlightSignups,
    ) -> Self {
        Self {
            identity,
            documents,
            in_flight,
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Provider` with the provider's message if sign-in
    /// is refused or the provider cannot be reached.
    pub async fn login(&self, credentials: &Credentials) -> Result<ProviderSession, AuthError> {
        let session = self.identity.sign_in(credentials).await?;
        tracing::info!(account_id = %session.account_id, "Signed in");
        Ok(session)
    }

    /// Create an account and write its profile.
    ///
    /// Only one signup per normalized email runs at a time.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SubmissionInProgress` if a signup for the same
    /// email is running, `AuthError::Provider` if account creation fails and
    /// `AuthError::ProfileNotSaved` if the profile write fails (the account
    /// has then been deleted, unless `rollback` says otherwise).
    pub async fn register(&self, signup: &ValidatedSignup) -> Result<ProviderSession, AuthError> {
        let key = signup.profile.email.normalized();

        if !self.in_flight.begin(&key).await {
            tracing::info!("Signup already in progress for this email");
            return Err(AuthError::SubmissionInProgress);
        }

        let result = self.create_account_with_profile(signup).await;
        self.in_flight.finish(&key).await;
        result
    }

    async fn create_account_with_profile(
        &self,
        signup: &ValidatedSignup,
    ) -> Result<ProviderSession, AuthError> {
        let document = profile_document(&signup.profile)?;

        let session = self.identity.sign_up(&signup.credentials).await?;
        tracing::info!(account_id = %session.account_id, "Account created");

        match self
            .documents
            .set_document(
                USERS_COLLECTION,
                session.account_id.as_str(),
                &document,
                &session,
            )
            .await
        {
            Ok(ack) => {
                tracing::info!(path = %ack.path, "Profile saved");
                Ok(session)
            }
            Err(source) => {
                tracing::warn!(
                    account_id = %session.account_id,
                    error = %source,
                    "Profile write failed, deleting account"
                );
                let rollback = self.identity.delete_account(&session).await.err();

                if let Some(e) = &rollback {
                    let event_id = sentry::capture_error(e);
                    tracing::error!(
                        account_id = %session.account_id,
                        store_error = %source,
                        delete_error = %e,
                        sentry_event_id = %event_id,
                        "Account left without profile: compensating delete failed"
                    );
                }

                Err(AuthError::ProfileNotSaved { source, rollback })
            }
        }
    }
}

/// Serialize a profile into a document body.
fn profile_document(profile: &ProfileRecord) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(profile)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(serde::de::Error::custom(format!(
            "profile serialized to {other}, expected an object"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chatboxt_core::{SignupForm, SignupValues};
    use serde_json::json;

    use super::*;
    use crate::identity::{MemoryDocumentStore, MemoryIdentityProvider};

    fn signup(email: &str) -> ValidatedSignup {
        SignupForm::with_values(SignupValues {
            name: "Curie".to_string(),
            first_name: "Marie".to_string(),
            email: email.to_string(),
            phone: "0612345678".to_string(),
            password: "Radium88!".to_string(),
            confirm_password: "Radium88!".to_string(),
            terms: true,
        })
        .begin_submission()
        .unwrap()
    }

    fn registry() -> InFlightSignups {
        InFlightSignups::new(Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_register_writes_profile_under_account_id() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);

        let session = service.register(&signup("marie@example.fr")).await.unwrap();

        let profile = documents
            .get(USERS_COLLECTION, session.account_id.as_str())
            .await
            .unwrap();
        assert_eq!(profile["name"], json!("Curie"));
        assert_eq!(profile["firstName"], json!("Marie"));
        assert_eq!(profile["email"], json!("marie@example.fr"));
        assert_eq!(profile["phone"], json!("0612345678"));
        assert!(!in_flight.contains("marie@example.fr"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_writes_nothing() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);
        service.register(&signup("marie@example.fr")).await.unwrap();

        let err = service
            .register(&signup("marie@example.fr"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "EMAIL_EXISTS");
        assert_eq!(documents.len().await, 1);
        assert!(!in_flight.contains("marie@example.fr"));
    }

    #[tokio::test]
    async fn test_profile_failure_deletes_account() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::rejecting("PERMISSION_DENIED");
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);

        let err = service
            .register(&signup("marie@example.fr"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::ProfileNotSaved { rollback: None, .. }
        ));
        assert_eq!(err.user_message(), "PERMISSION_DENIED");
        assert!(!identity.contains("marie@example.fr").await);
    }

    #[tokio::test]
    async fn test_failed_rollback_is_reported() {
        let identity = MemoryIdentityProvider::rejecting_deletes("TOKEN_EXPIRED");
        let documents = MemoryDocumentStore::rejecting("PERMISSION_DENIED");
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);

        let err = service
            .register(&signup("marie@example.fr"))
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        assert_eq!(err.user_message(), "PERMISSION_DENIED");
        assert!(identity.contains("marie@example.fr").await);
    }

    #[tokio::test]
    async fn test_register_refused_while_in_flight() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);

        assert!(in_flight.begin("marie@example.fr").await);
        let err = service
            .register(&signup("Marie@Example.fr"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::SubmissionInProgress));
        assert_eq!(identity.account_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_after_register() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();
        let in_flight = registry();
        let service = AuthService::new(&identity, &documents, &in_flight);
        let created = service.register(&signup("marie@example.fr")).await.unwrap();

        let session = service
            .login(&Credentials::new("marie@example.fr", "Radium88!"))
            .await
            .unwrap();
        assert_eq!(session.account_id, created.account_id);

        let err = service
            .login(&Credentials::new("marie@example.fr", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "INVALID_LOGIN_CREDENTIALS");
    }
}
