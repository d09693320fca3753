//! Session-stored models.

pub mod session;

pub use session::{CurrentUser, Notice, NoticeKind, keys as session_keys};
