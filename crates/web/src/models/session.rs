//! Session-related types.
//!
//! Types stored in the session for authentication state and one-shot notices.

use serde::{Deserialize, Serialize};

use chatboxt_core::AccountId;

use crate::identity::ProviderSession;

/// Session-stored user identity.
///
/// Minimal data read from the provider session on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Provider account ID.
    pub id: AccountId,
    /// Account email.
    pub email: String,
}

impl From<&ProviderSession> for CurrentUser {
    fn from(session: &ProviderSession) -> Self {
        Self {
            id: session.account_id.clone(),
            email: session.email.clone(),
        }
    }
}

/// Kind of a notice, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Kind of notice.
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// A success notice.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// CSS class for the notice banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Error => "notice notice-error",
        }
    }

    /// ARIA role: errors interrupt, successes do not.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "status",
            NoticeKind::Error => "alert",
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the "is logged in" flag.
    pub const LOGGED_IN: &str = "logged_in";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the one-shot notice.
    pub const FLASH: &str = "flash";
}
