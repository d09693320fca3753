//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{AuthBackend, WebConfig};
use crate::identity::{
    DocumentStore, FirebaseAuthClient, FirestoreClient, IdentityProvider, MemoryDocumentStore,
    MemoryIdentityProvider,
};
use crate::services::auth::{AuthService, InFlightSignups};

/// Sequential provider calls one signup can make: sign-up, profile write,
/// compensating delete.
const CALLS_PER_SIGNUP: u32 = 3;

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// identity provider, the document store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    in_flight: InFlightSignups,
}

impl AppState {
    /// Create application state from explicit backends.
    ///
    /// In-flight signups expire after the time the provider calls of one
    /// signup can take.
    #[must_use]
    pub fn new(
        config: WebConfig,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let in_flight = InFlightSignups::new(config.http_timeout * CALLS_PER_SIGNUP);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                documents,
                in_flight,
            }),
        }
    }

    /// Create application state with the backend selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: WebConfig) -> Result<Self, StateError> {
        let (identity, documents): (Arc<dyn IdentityProvider>, Arc<dyn DocumentStore>) =
            match &config.backend {
                AuthBackend::Firebase(firebase) => {
                    let client = reqwest::Client::builder()
                        .timeout(config.http_timeout)
                        .build()?;
                    tracing::info!(
                        project_id = %firebase.project_id,
                        app_id = firebase.app_id.as_deref().unwrap_or("-"),
                        auth_domain = %firebase.auth_domain,
                        "Using Firebase backend"
                    );
                    (
                        Arc::new(FirebaseAuthClient::new(client.clone(), firebase)),
                        Arc::new(FirestoreClient::new(client, firebase)),
                    )
                }
                AuthBackend::Memory => {
                    tracing::warn!("Using in-memory backend; accounts are lost on restart");
                    (
                        Arc::new(MemoryIdentityProvider::new()),
                        Arc::new(MemoryDocumentStore::new()),
                    )
                }
            };

        Ok(Self::new(config, identity, documents))
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get the document store.
    #[must_use]
    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    /// Get the registry of signups currently running.
    #[must_use]
    pub fn in_flight(&self) -> &InFlightSignups {
        &self.inner.in_flight
    }

    /// Get the authentication service.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.identity(), self.documents(), self.in_flight())
    }
}
