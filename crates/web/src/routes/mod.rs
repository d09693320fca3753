//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Login page
//! POST /                          - Login action
//! GET  /inscription               - Signup page
//! POST /inscription               - Signup action
//! POST /inscription/check/{field} - Validate one signup field (fragment)
//! POST /logout                    - Logout action
//!
//! # Requires login
//! GET  /chatboXt                  - Post-login landing page
//! ```

pub mod auth;
pub mod chat;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Path of the post-login page.
pub const CHAT_PATH: &str = "/chatboXt";

/// Path of the signup page.
pub const SIGNUP_PATH: &str = "/inscription";

/// Create the signup routes router.
pub fn signup_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::signup_page).post(auth::signup))
        .route("/check/{field}", post(auth::check_field))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .nest(SIGNUP_PATH, signup_routes())
        .route("/logout", post(auth::logout))
        .route(CHAT_PATH, get(chat::index))
}
