//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record in span and Sentry scope)
//! 4. Security headers (CSP, frame options, ...)
//! 5. Session layer (tower-sessions with `MemoryStore`)

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AuthRejection, RequireAuth, clear_current_user, set_current_user};
pub use flash::{set_notice, take_notice};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
