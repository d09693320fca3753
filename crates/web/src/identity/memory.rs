//! In-process identity provider and document store.
//!
//! Selected with `CHATBOXT_AUTH_BACKEND=memory`. Accounts and documents live
//! in `tokio::sync::RwLock`-guarded maps and are lost on restart. Rejections
//! use the same messages as Firebase so pages render identically.

use std::collections::HashMap;

use async_trait::async_trait;
use chatboxt_core::{AccountId, Credentials, Email};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Ack, Document, DocumentStore, IdentityProvider, ProviderError, ProviderSession, StoreError,
};

/// Shortest password the provider accepts.
const MIN_PROVIDER_PASSWORD_CHARS: usize = 6;

struct Account {
    id: AccountId,
    email: String,
    password: SecretString,
    id_token: SecretString,
}

/// In-memory identity provider keyed by normalized email.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    delete_failure: Option<String>,
}

impl MemoryIdentityProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider whose `delete_account` always fails with `message`.
    #[must_use]
    pub fn rejecting_deletes(message: impl Into<String>) -> Self {
        Self {
            delete_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether an account exists for `email`.
    pub async fn contains(&self, email: &str) -> bool {
        self.accounts.read().await.contains_key(&normalize(email))
    }

    /// Number of accounts.
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    fn session(account: &Account) -> ProviderSession {
        ProviderSession {
            account_id: account.id.clone(),
            email: account.email.clone(),
            id_token: account.id_token.clone(),
        }
    }
}

fn normalize(email: &str) -> String {
    Email::parse(email).map_or_else(|_| email.trim().to_lowercase(), |e| e.normalized())
}

fn rejected(message: &str) -> ProviderError {
    ProviderError::Rejected {
        code: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError> {
        let accounts = self.accounts.read().await;

        accounts
            .get(&normalize(&credentials.email))
            .filter(|account| {
                account.password.expose_secret() == credentials.password.expose_secret()
            })
            .map(Self::session)
            .ok_or_else(|| rejected("INVALID_LOGIN_CREDENTIALS"))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<ProviderSession, ProviderError> {
        if credentials.email.trim().is_empty() {
            return Err(rejected("MISSING_EMAIL"));
        }
        if credentials.password.expose_secret().chars().count() < MIN_PROVIDER_PASSWORD_CHARS {
            return Err(rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }

        let key = normalize(&credentials.email);
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(rejected("EMAIL_EXISTS"));
        }

        let account = Account {
            id: AccountId::new(Uuid::new_v4().simple().to_string()),
            email: credentials.email.trim().to_string(),
            password: credentials.password.clone(),
            id_token: SecretString::from(Uuid::new_v4().to_string()),
        };
        let session = Self::session(&account);
        accounts.insert(key, account);

        Ok(session)
    }

    async fn delete_account(&self, session: &ProviderSession) -> Result<(), ProviderError> {
        if let Some(message) = &self.delete_failure {
            return Err(rejected(message));
        }

        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|_, account| {
            account.id_token.expose_secret() != session.id_token.expose_secret()
        });

        if accounts.len() == before {
            return Err(rejected("USER_NOT_FOUND"));
        }
        Ok(())
    }
}

/// In-memory document store keyed by `{collection}/{id}`.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
    failure: Option<String>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses every write with `message`.
    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Get a copy of the document `{collection}/{id}`.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .get(&format!("{collection}/{id}"))
            .cloned()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        _auth: &ProviderSession,
    ) -> Result<Ack, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Rejected {
                code: 403,
                message: message.clone(),
            });
        }
        if collection.is_empty() || id.is_empty() {
            return Err(StoreError::InvalidPath(format!("{collection}/{id}")));
        }

        let path = format!("{collection}/{id}");
        self.documents
            .write()
            .await
            .insert(path.clone(), document.clone());

        Ok(Ack {
            path,
            update_time: Some(chrono::Utc::now()),
        })
    }
}
