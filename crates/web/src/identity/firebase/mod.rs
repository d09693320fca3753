//! Firebase Authentication (Identity Toolkit) and Cloud Firestore REST clients.
//!
//! # Endpoints
//!
//! ```text
//! POST https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key={apiKey}
//! POST https://identitytoolkit.googleapis.com/v1/accounts:signUp?key={apiKey}
//! POST https://identitytoolkit.googleapis.com/v1/accounts:delete?key={apiKey}
//! PATCH https://firestore.googleapis.com/v1/projects/{project}/databases/(default)/documents/{collection}/{id}
//! ```
//!
//! Both APIs report failures as `{"error": {"code": .., "message": ..}}`; the
//! message is passed through unchanged (`EMAIL_EXISTS`,
//! `INVALID_LOGIN_CREDENTIALS`, ...).

mod firestore;
mod types;

pub use firestore::FirestoreClient;

use std::sync::Arc;

use async_trait::async_trait;
use chatboxt_core::{AccountId, Credentials};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use url::Url;

use self::types::{AuthResponse, DeleteRequest, ErrorEnvelope, PasswordRequest};
use super::{IdentityProvider, ProviderError, ProviderSession, StoreError};
use crate::config::FirebaseConfig;

/// Identity Toolkit REST base URL.
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Maximum number of body characters copied into logs.
const LOGGED_BODY_CHARS: usize = 500;

/// Client for Firebase Authentication.
///
/// Cheap to clone; the underlying `reqwest::Client` carries the request timeout.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    inner: Arc<FirebaseAuthClientInner>,
}

struct FirebaseAuthClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl FirebaseAuthClient {
    /// Create a client for the project described by `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &FirebaseConfig) -> Self {
        Self::with_base_url(client, config.api_key.clone(), IDENTITY_TOOLKIT_URL)
    }

    /// Create a client against a different Identity Toolkit host, such as the
    /// Firebase Auth emulator.
    #[must_use]
    pub fn with_base_url(
        client: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(FirebaseAuthClientInner {
                client,
                base_url: base_url.into(),
                api_key,
            }),
        }
    }

    /// URL of an `accounts:{method}` endpoint, with the API key attached.
    fn endpoint(&self, method: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}/accounts:{method}", self.inner.base_url))?;
        url.query_pairs_mut()
            .append_pair("key", self.inner.api_key.expose_secret());
        Ok(url)
    }

    /// POST a password request and turn the answer into a session.
    async fn password_call(
        &self,
        method: &str,
        credentials: &Credentials,
    ) -> Result<ProviderSession, ProviderError> {
        let body = PasswordRequest {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
            return_secure_token: true,
        };

        let response = self
            .inner
            .client
            .post(self.endpoint(method)?)
            .json(&body)
            .send()
            .await?;

        let auth: AuthResponse = read_response(response).await?;

        Ok(ProviderSession {
            account_id: AccountId::new(auth.local_id),
            email: auth.email.unwrap_or_else(|| credentials.email.clone()),
            id_token: SecretString::from(auth.id_token),
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError> {
        self.password_call("signInWithPassword", credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError> {
        self.password_call("signUp", credentials).await
    }

    async fn delete_account(&self, session: &ProviderSession) -> Result<(), ProviderError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("delete")?)
            .json(&DeleteRequest {
                id_token: session.id_token.expose_secret(),
            })
            .send()
            .await?;

        let _: IgnoredAny = read_response(response).await?;
        Ok(())
    }
}

// =============================================================================
// Response handling
// =============================================================================

/// Failure reading a Firebase response, before it is mapped to the caller's
/// error type.
#[derive(Debug)]
enum ResponseFailure {
    Rejected { code: u16, message: String },
    Http(reqwest::Error),
    Parse(String),
}

impl From<ResponseFailure> for ProviderError {
    fn from(failure: ResponseFailure) -> Self {
        match failure {
            ResponseFailure::Rejected { code, message } => Self::Rejected { code, message },
            ResponseFailure::Http(e) => Self::Http(e),
            ResponseFailure::Parse(e) => Self::Parse(e),
        }
    }
}

impl From<ResponseFailure> for StoreError {
    fn from(failure: ResponseFailure) -> Self {
        match failure {
            ResponseFailure::Rejected { code, message } => Self::Rejected { code, message },
            ResponseFailure::Http(e) => Self::Http(e),
            ResponseFailure::Parse(e) => Self::Parse(e),
        }
    }
}

/// Read a response body, returning the provider's error message on failure.
async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ResponseFailure> {
    let status = response.status();
    let text = response.text().await.map_err(ResponseFailure::Http)?;

    if !status.is_success() {
        return Err(rejection(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
            "Failed to parse Firebase response"
        );
        ResponseFailure::Parse(e.to_string())
    })
}

fn rejection(status: reqwest::StatusCode, body: &str) -> ResponseFailure {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        tracing::debug!(
            status = %status,
            message = %envelope.error.message,
            "Firebase rejected request"
        );
        return ResponseFailure::Rejected {
            code: envelope.error.code,
            message: envelope.error.message,
        };
    }

    tracing::error!(
        status = %status,
        body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
        "Firebase returned non-success status without an error body"
    );
    ResponseFailure::Rejected {
        code: status.as_u16(),
        message: format!("HTTP {status}"),
    }
}
