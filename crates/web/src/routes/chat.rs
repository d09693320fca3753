//! Post-login landing page.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{RequireAuth, take_notice};
use crate::models::{CurrentUser, Notice};

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub user: CurrentUser,
    pub notice: Option<Notice>,
}

/// Display the landing page. Anonymous visitors are redirected to `/`.
pub async fn index(RequireAuth(user): RequireAuth, session: Session) -> ChatTemplate {
    ChatTemplate {
        user,
        notice: take_notice(&session).await,
    }
}
