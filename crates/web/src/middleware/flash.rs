//! One-shot notices carried across a redirect.

use tower_sessions::Session;

use crate::models::{Notice, session_keys};

/// Store a notice to show on the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_notice(
    session: &Session,
    notice: &Notice,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, notice).await
}

/// Remove and return the pending notice, if any.
///
/// A notice that cannot be read is dropped.
pub async fn take_notice(session: &Session) -> Option<Notice> {
    session
        .remove::<Notice>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_notice_is_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_notice(&session, &Notice::success("Welcome marie@example.fr"))
            .await
            .unwrap();

        assert_eq!(
            take_notice(&session).await,
            Some(Notice::success("Welcome marie@example.fr"))
        );
        assert_eq!(take_notice(&session).await, None);
    }
}
