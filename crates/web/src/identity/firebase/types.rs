//! Firebase REST wire types.

use serde::{Deserialize, Serialize};

/// Body of `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Body of `accounts:delete`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest<'a> {
    pub id_token: &'a str,
}

/// Successful sign-in or sign-up response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
}

/// Error envelope shared by the Identity Toolkit and Firestore APIs.
///
/// ```json
/// {"error": {"code": 400, "message": "EMAIL_EXISTS", "status": "INVALID_ARGUMENT"}}
/// ```
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Firestore document returned by a `PATCH`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub update_time: Option<chrono::DateTime<chrono::Utc>>,
}
