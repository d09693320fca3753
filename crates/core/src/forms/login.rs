//! Login form model.

use core::fmt;

use super::{FieldError, FieldState, FormStatus};
use crate::types::Credentials;

/// A field of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    /// Email address.
    Email,
    /// Password.
    Password,
}

impl LoginField {
    /// All fields, in form order.
    pub const ALL: [Self; 2] = [Self::Email, Self::Password];

    /// Input name used by the HTML form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    /// Message shown when the field is missing.
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::Email => "Email requis",
            Self::Password => "Mot de passe requis",
        }
    }
}

/// Raw values entered on the login form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginValues {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for LoginValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginValues")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login form state.
///
/// Both fields are only required to be non-empty; the identity provider is the
/// judge of whether the email and password are correct.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    values: LoginValues,
    email: FieldState,
    password: FieldState,
}

impl LoginForm {
    /// Create a form pre-filled with `values`, both fields untouched.
    #[must_use]
    pub fn with_values(values: LoginValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Current values.
    #[must_use]
    pub const fn values(&self) -> &LoginValues {
        &self.values
    }

    /// Update a field value and revalidate it.
    pub fn change(&mut self, field: LoginField, value: &str) {
        match field {
            LoginField::Email => value.clone_into(&mut self.values.email),
            LoginField::Password => value.clone_into(&mut self.values.password),
        }
        self.blur(field);
    }

    /// Validate a field without changing its value.
    pub fn blur(&mut self, field: LoginField) {
        let (value, state) = match field {
            LoginField::Email => (&self.values.email, &mut self.email),
            LoginField::Password => (&self.values.password, &mut self.password),
        };
        *state = if value.trim().is_empty() {
            FieldState::Invalid(FieldError::Required)
        } else {
            FieldState::Valid
        };
    }

    /// Validation state of one field.
    #[must_use]
    pub const fn state(&self, field: LoginField) -> &FieldState {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    /// Aggregate status from the current field states.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        FormStatus::from_states([&self.email, &self.password])
    }

    /// Message to display under a field, if it is invalid.
    #[must_use]
    pub const fn message(&self, field: LoginField) -> Option<&'static str> {
        match self.state(field) {
            FieldState::Invalid(_) => Some(field.required_message()),
            FieldState::Untouched | FieldState::Valid => None,
        }
    }

    /// Validate both fields and return the credentials if the form is ready.
    pub fn submission(&mut self) -> Option<Credentials> {
        for field in LoginField::ALL {
            self.blur(field);
        }

        self.status()
            .is_ready()
            .then(|| Credentials::new(self.values.email.trim(), self.values.password.as_str()))
    }
}
