//! Authentication middleware and extractors.
//!
//! Provides the extractor guarding `/chatboXt` and the helpers that set and
//! clear the logged-in state in the session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/";

/// Extractor that requires a logged-in user.
///
/// If the user is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when the user is not logged in.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let logged_in: bool = session
            .get(session_keys::LOGGED_IN)
            .await
            .ok()
            .flatten()
            .unwrap_or(false);
        if !logged_in {
            return Err(AuthRejection);
        }

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(user))
    }
}

/// Record the logged-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::LOGGED_IN, true).await
}

/// Clear the logged-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<bool>(session_keys::LOGGED_IN).await?;
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Request, StatusCode, header};
    use chatboxt_core::AccountId;
    use tower_sessions::MemoryStore;

    use super::*;

    fn parts_with(session: Option<Session>) -> Parts {
        let (mut parts, ()) = Request::builder()
            .uri("/chatboXt")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: AccountId::new("uid-1"),
            email: "marie@example.fr".to_string(),
        }
    }

    #[tokio::test]
    async fn test_logged_in_user_is_extracted() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_current_user(&session, &user()).await.unwrap();

        let mut parts = parts_with(Some(session));
        let RequireAuth(extracted) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted, user());
    }

    #[tokio::test]
    async fn test_anonymous_is_redirected_to_login() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut parts = parts_with(Some(session));

        let rejection = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_logout_clears_flag() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_current_user(&session, &user()).await.unwrap();
        clear_current_user(&session).await.unwrap();

        let mut parts = parts_with(Some(session));
        assert!(RequireAuth::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_rejected() {
        let mut parts = parts_with(None);
        assert!(RequireAuth::from_request_parts(&mut parts, &()).await.is_err());
    }
}
