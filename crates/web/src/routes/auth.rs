//! Login and signup route handlers.
//!
//! Validation runs before any provider call. Invalid forms are re-rendered
//! with `422 Unprocessable Entity` and the per-field messages; provider
//! rejections are re-rendered with a notice carrying the provider message.
//! Password fields are never written back into the HTML.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use chatboxt_core::{
    LoginField, LoginForm, LoginValues, PasswordStrength, SignupField, SignupForm, SignupValues,
    UnknownField, checkbox_checked,
};

use super::CHAT_PATH;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{clear_current_user, set_current_user, set_notice, take_notice};
use crate::models::{CurrentUser, Notice};
use crate::services::auth::{AuthError, SIGNUP_IN_PROGRESS_MESSAGE};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl From<LoginInput> for LoginValues {
    fn from(input: LoginInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
        }
    }
}

/// Signup form data, with the HTML input names.
///
/// `terms` is absent when the checkbox is unchecked.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupInput {
    pub name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub terms: Option<String>,
}

impl From<SignupInput> for SignupValues {
    fn from(input: SignupInput) -> Self {
        Self {
            name: input.name,
            first_name: input.first_name,
            email: input.email,
            phone: input.phone,
            password: input.password,
            confirm_password: input.confirm_password,
            terms: input.terms.as_deref().is_some_and(checkbox_checked),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub form: LoginForm,
    pub notice: Option<Notice>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub form: SignupForm,
    pub notice: Option<Notice>,
}

/// Messages for one signup field, swapped in on blur.
#[derive(Template, WebTemplate)]
#[template(path = "auth/field_check.html")]
pub struct FieldCheckTemplate {
    pub field: SignupField,
    pub messages: Vec<String>,
    pub strength: Option<PasswordStrength>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> LoginTemplate {
    LoginTemplate {
        form: LoginForm::default(),
        notice: take_notice(&session).await,
    }
}

/// Handle login form submission.
///
/// On success the logged-in flag is set and the browser is sent to
/// `/chatboXt` with a `Bienvenue {email}` notice.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<LoginInput>,
) -> Result<Response> {
    let mut form = LoginForm::with_values(input.into());

    let Some(credentials) = form.submission() else {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate { form, notice: None },
        )
            .into_response());
    };

    match state.auth().login(&credentials).await {
        Ok(account) => {
            let user = CurrentUser::from(&account);
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(&user.email));
            set_notice(&session, &Notice::success(format!("Bienvenue {}", user.email))).await?;

            Ok(Redirect::to(CHAT_PATH).into_response())
        }
        Err(e) => {
            if e.is_server_error() {
                tracing::error!(error = %e, "Login failed");
            } else {
                tracing::info!(error = %e, "Login refused");
            }

            let notice = Notice::error(format!("Erreur: {}", e.user_message()));
            Ok(LoginTemplate {
                form,
                notice: Some(notice),
            }
            .into_response())
        }
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(session: Session) -> SignupTemplate {
    SignupTemplate {
        form: SignupForm::new(),
        notice: take_notice(&session).await,
    }
}

/// Handle signup form submission.
///
/// On success the browser is sent to the login page with a
/// `Welcome {email}` notice.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<SignupInput>,
) -> Result<Response> {
    let mut form = SignupForm::with_values(input.into());

    let signup = match form.begin_submission() {
        Ok(signup) => signup,
        Err(blocked) => {
            tracing::debug!(reason = %blocked, "Signup blocked");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                SignupTemplate { form, notice: None },
            )
                .into_response());
        }
    };

    add_breadcrumb(
        "auth",
        "Signup submitted",
        Some(&[("email_domain", signup.profile.email.domain())]),
    );

    let result = state.auth().register(&signup).await;
    form.finish_submission();

    match result {
        Ok(account) => {
            set_notice(&session, &Notice::success(format!("Welcome {}", account.email))).await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(AuthError::SubmissionInProgress) => Ok((
            StatusCode::CONFLICT,
            SignupTemplate {
                form,
                notice: Some(Notice::error(SIGNUP_IN_PROGRESS_MESSAGE)),
            },
        )
            .into_response()),
        Err(e @ AuthError::Encode(_)) => Err(AppError::Auth(e)),
        Err(e) => {
            if e.is_server_error() {
                tracing::error!(error = %e, "Signup failed");
            } else {
                tracing::info!(error = %e, "Signup refused");
            }

            let notice = Notice::error(format!("Error: {}", e.user_message()));
            Ok(SignupTemplate {
                form,
                notice: Some(notice),
            }
            .into_response())
        }
    }
}

/// Validate one signup field from the posted form and return its messages.
///
/// `confirmPassword` is checked against the posted `password`.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown field name.
pub async fn check_field(
    Path(field): Path<String>,
    Form(input): Form<SignupInput>,
) -> Result<FieldCheckTemplate> {
    let field: SignupField = field
        .parse()
        .map_err(|e: UnknownField| AppError::NotFound(e.to_string()))?;

    let mut form = SignupForm::with_values(input.into());
    form.blur(field);

    Ok(FieldCheckTemplate {
        field,
        messages: form.messages(field),
        strength: (field == SignupField::Password).then(|| form.password_strength()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::extract::FromRequest;
    use serde::de::DeserializeOwned;

    use super::*;

    /// Decode an urlencoded body the way the handlers receive it.
    async fn decode_form<T: DeserializeOwned>(body: &str) -> T {
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        let Ok(Form(value)) = Form::<T>::from_request(request, &()).await else {
            panic!("form body should decode: {body}");
        };
        value
    }

    #[tokio::test]
    async fn test_signup_input_field_names() {
        let input: SignupInput = decode_form(
            "name=Curie&firstName=Marie&email=marie%40example.fr&phone=0612345678\
             &password=Radium88%21&confirmPassword=Radium88%21&terms=on",
        )
        .await;
        let values = SignupValues::from(input);

        assert_eq!(values.first_name, "Marie");
        assert_eq!(values.email, "marie@example.fr");
        assert_eq!(values.confirm_password, "Radium88!");
        assert!(values.terms);
    }

    #[tokio::test]
    async fn test_missing_checkbox_is_unchecked() {
        let values = SignupValues::from(decode_form::<SignupInput>("name=Curie").await);
        assert!(!values.terms);
        assert!(values.password.is_empty());
    }

    #[test]
    fn test_login_template_never_echoes_password() {
        let mut form = LoginForm::with_values(LoginValues {
            email: "marie@example.fr".to_string(),
            password: "Radium88!".to_string(),
        });
        form.blur(LoginField::Email);
        let html = LoginTemplate {
            form,
            notice: Some(Notice::error("Erreur: INVALID_LOGIN_CREDENTIALS")),
        }
        .render()
        .unwrap();

        assert!(html.contains("value=\"marie@example.fr\""));
        assert!(html.contains("Erreur: INVALID_LOGIN_CREDENTIALS"));
        assert!(!html.contains("Radium88!"));
    }

    #[test]
    fn test_signup_template_lists_password_criteria() {
        let mut form = SignupForm::new();
        form.change(SignupField::Password, "abc");
        let html = SignupTemplate { form, notice: None }.render().unwrap();

        assert!(html.contains("Le mot de passe est trop simple."));
        assert!(html.contains("Contenir au moins une lettre majuscule"));
        assert!(html.contains("Avoir une longueur minimale de 8 caractères"));
        assert!(!html.contains("value=\"abc\""));
    }

    #[test]
    fn test_field_check_fragment() {
        let html = FieldCheckTemplate {
            field: SignupField::Phone,
            messages: vec!["Numéro de téléphone invalide".to_string()],
            strength: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"phone-messages\""));
        assert!(html.contains("Numéro de téléphone invalide"));
    }
}
