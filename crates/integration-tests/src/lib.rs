//! Integration tests for chatboXt.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chatboxt-integration-tests
//! ```
//!
//! Every test starts its own server on an ephemeral port, backed by the
//! in-memory identity provider and document store, and drives it with a
//! cookie-keeping `reqwest` client. Redirects are not followed so tests can
//! assert on them.
//!
//! # Test Categories
//!
//! - `signup_flow` - Signup page, field checks, compensation
//! - `login_flow` - Login page, protected page, logout
//! - `router` - Middleware stack, driven in-process with `oneshot`

use std::sync::Arc;

use chatboxt_core::Credentials;
use chatboxt_web::config::WebConfig;
use chatboxt_web::identity::{IdentityProvider, MemoryDocumentStore, MemoryIdentityProvider};
use chatboxt_web::state::AppState;
use reqwest::{Client, Response, redirect};

/// Password meeting every criterion.
pub const STRONG_PASSWORD: &str = "Radium88!";

/// A running server plus handles on its backends.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub identity: Arc<MemoryIdentityProvider>,
    pub documents: Arc<MemoryDocumentStore>,
    pub state: AppState,
}

impl TestContext {
    /// Start a server with empty in-memory backends.
    pub async fn new() -> Self {
        Self::with_backends(MemoryIdentityProvider::new(), MemoryDocumentStore::new()).await
    }

    /// Start a server with the given backends.
    pub async fn with_backends(
        identity: MemoryIdentityProvider,
        documents: MemoryDocumentStore,
    ) -> Self {
        let identity = Arc::new(identity);
        let documents = Arc::new(documents);
        let state = AppState::new(WebConfig::local(), identity.clone(), documents.clone());
        let app = chatboxt_web::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read test listener address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            identity,
            documents,
            state,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST an urlencoded form to `path`.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Submit the login form.
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/", &[("email", email), ("password", password)])
            .await
    }

    /// Submit the signup form.
    pub async fn signup(&self, form: &[(&str, &str)]) -> Response {
        self.post_form("/inscription", form).await
    }

    /// Create an account directly at the provider, bypassing the pages.
    pub async fn create_account(&self, email: &str, password: &str) {
        self.identity
            .sign_up(&Credentials::new(email, password))
            .await
            .expect("Failed to create account");
    }
}

/// A signup form that passes every field rule.
#[must_use]
pub fn valid_signup(email: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("name", "Curie"),
        ("firstName", "Marie"),
        ("email", email),
        ("phone", "+33612345678"),
        ("password", STRONG_PASSWORD),
        ("confirmPassword", STRONG_PASSWORD),
        ("terms", "on"),
    ]
}

/// Replace one field of a form.
#[must_use]
pub fn with_field<'a>(
    mut form: Vec<(&'static str, &'a str)>,
    name: &str,
    value: &'a str,
) -> Vec<(&'static str, &'a str)> {
    for (key, current) in &mut form {
        if *key == name {
            *current = value;
        }
    }
    form
}

/// Remove one field from a form, as a browser does for an unchecked box.
#[must_use]
pub fn without_field<'a>(
    form: Vec<(&'static str, &'a str)>,
    name: &str,
) -> Vec<(&'static str, &'a str)> {
    form.into_iter().filter(|(key, _)| *key != name).collect()
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
