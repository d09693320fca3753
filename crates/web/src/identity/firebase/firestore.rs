//! Cloud Firestore document writes.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use url::Url;

use super::read_response;
use super::types::FirestoreDocument;
use crate::config::FirebaseConfig;
use crate::identity::{Ack, Document, DocumentStore, ProviderSession, StoreError};

/// Firestore REST base URL.
pub const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Client for the Firestore `(default)` database of one project.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    documents_url: String,
}

impl FirestoreClient {
    /// Create a client for the project described by `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &FirebaseConfig) -> Self {
        Self::with_base_url(client, FIRESTORE_URL, &config.project_id)
    }

    /// Create a client against a different Firestore host, such as the
    /// Firestore emulator.
    #[must_use]
    pub fn with_base_url(client: reqwest::Client, base_url: &str, project_id: &str) -> Self {
        Self {
            inner: Arc::new(FirestoreClientInner {
                client,
                documents_url: format!(
                    "{base_url}/projects/{project_id}/databases/(default)/documents"
                ),
            }),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url, StoreError> {
        for segment in [collection, id] {
            if segment.is_empty() || segment.contains('/') {
                return Err(StoreError::InvalidPath(format!("{collection}/{id}")));
            }
        }

        Url::parse(&format!("{}/{collection}/{id}", self.inner.documents_url))
            .map_err(|e| StoreError::InvalidPath(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        auth: &ProviderSession,
    ) -> Result<Ack, StoreError> {
        let url = self.document_url(collection, id)?;

        let response = self
            .inner
            .client
            .patch(url)
            .bearer_auth(auth.id_token.expose_secret())
            .json(&json!({ "fields": encode_fields(document) }))
            .send()
            .await?;

        let written: FirestoreDocument = read_response(response).await?;
        tracing::debug!(name = %written.name, "Firestore document written");

        Ok(Ack {
            path: format!("{collection}/{id}"),
            update_time: written.update_time,
        })
    }
}

// =============================================================================
// Value encoding
// =============================================================================

/// Encode a document body as Firestore `fields`.
#[must_use]
pub fn encode_fields(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Encode one JSON value as a typed Firestore value.
///
/// ```text
/// "Curie"      -> {"stringValue": "Curie"}
/// 42           -> {"integerValue": "42"}
/// 1.5          -> {"doubleValue": 1.5}
/// true         -> {"booleanValue": true}
/// null         -> {"nullValue": null}
/// [..]         -> {"arrayValue": {"values": [..]}}
/// {..}         -> {"mapValue": {"fields": {..}}}
/// ```
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore transports 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}
