//! Signup form model.

use core::fmt;
use std::str::FromStr;

use secrecy::SecretString;

use super::{FieldError, FieldState, FormStatus};
use crate::types::{
    Credentials, Email, EmailError, NameError, Password, PasswordCriterion, PasswordError,
    PasswordStrength, PersonName, PhoneError, PhoneNumber, ProfileRecord,
};

/// Heading shown above the list of unmet password criteria.
pub const PASSWORD_RULES_HEADER: &str =
    "Le mot de passe est trop simple. Il doit respecter les critères suivants :";

/// A field of the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignupField {
    /// Last name.
    Name,
    /// First name.
    FirstName,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Password.
    Password,
    /// Password confirmation.
    ConfirmPassword,
    /// Terms acceptance checkbox.
    Terms,
}

impl SignupField {
    /// All fields, in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::FirstName,
        Self::Email,
        Self::Phone,
        Self::Password,
        Self::ConfirmPassword,
        Self::Terms,
    ];

    /// Input name used by the HTML form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "firstName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Terms => "terms",
        }
    }

    /// Messages to display for a validation error on this field.
    #[must_use]
    pub fn messages(self, error: &FieldError) -> Vec<String> {
        match self {
            Self::Name => vec!["Nom requis (max 20 caractères)".to_string()],
            Self::FirstName => vec!["Prénom requis (max 20 caractères)".to_string()],
            Self::Email => vec!["Email invalide".to_string()],
            Self::Phone => vec!["Numéro de téléphone invalide".to_string()],
            Self::Password => {
                let unmet = match error {
                    FieldError::Password(PasswordError::TooWeak { unmet }) => unmet.clone(),
                    _ => PasswordCriterion::ALL.to_vec(),
                };
                std::iter::once(PASSWORD_RULES_HEADER.to_string())
                    .chain(unmet.into_iter().map(|c| c.message().to_string()))
                    .collect()
            }
            Self::ConfirmPassword => vec!["Les mots de passe ne correspondent pas".to_string()],
            Self::Terms => vec!["Vous devez accepter les termes et conditions".to_string()],
        }
    }
}

impl fmt::Display for SignupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signup field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for SignupField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Raw values entered on the signup form.
///
/// Implements `Debug` manually to redact the password fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupValues {
    /// Last name.
    pub name: String,
    /// First name.
    pub first_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Whether the terms checkbox is checked.
    pub terms: bool,
}

impl fmt::Debug for SignupValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupValues")
            .field("name", &self.name)
            .field("first_name", &self.first_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("terms", &self.terms)
            .finish()
    }
}

impl SignupValues {
    /// Validate one field against the current values.
    #[must_use]
    pub fn validate(&self, field: SignupField) -> FieldState {
        match field {
            SignupField::Name => name_state(&self.name),
            SignupField::FirstName => name_state(&self.first_name),
            SignupField::Email => match Email::parse(self.email.trim()) {
                Err(EmailError::Empty) => FieldState::Invalid(FieldError::Required),
                other => FieldState::from_result(other),
            },
            SignupField::Phone => match PhoneNumber::parse(&self.phone) {
                Err(PhoneError::Empty) => FieldState::Invalid(FieldError::Required),
                other => FieldState::from_result(other),
            },
            SignupField::Password => match Password::parse(&self.password) {
                Err(PasswordError::Empty) => FieldState::Invalid(FieldError::Required),
                other => FieldState::from_result(other),
            },
            SignupField::ConfirmPassword => {
                if self.confirm_password.is_empty() {
                    FieldState::Invalid(FieldError::Required)
                } else if self.confirm_password != self.password {
                    FieldState::Invalid(FieldError::Mismatch)
                } else {
                    FieldState::Valid
                }
            }
            SignupField::Terms => {
                if self.terms {
                    FieldState::Valid
                } else {
                    FieldState::Invalid(FieldError::TermsNotAccepted)
                }
            }
        }
    }

    /// Parse every field into typed values, or `None` if any field is invalid.
    fn parse(&self) -> Option<ValidatedSignup> {
        if !self.terms || self.confirm_password != self.password {
            return None;
        }

        let email = Email::parse(self.email.trim()).ok()?;
        let password = Password::parse(&self.password).ok()?;

        Some(ValidatedSignup {
            credentials: Credentials {
                email: email.as_str().to_string(),
                password: password.into_secret(),
            },
            profile: ProfileRecord {
                name: PersonName::parse(&self.name).ok()?,
                first_name: PersonName::parse(&self.first_name).ok()?,
                email,
                phone: PhoneNumber::parse(&self.phone).ok()?,
            },
        })
    }
}

fn name_state(value: &str) -> FieldState {
    match PersonName::parse(value) {
        Err(NameError::Empty) => FieldState::Invalid(FieldError::Required),
        other => FieldState::from_result(other),
    }
}

/// A fully validated signup, ready for account creation.
#[derive(Debug, Clone)]
pub struct ValidatedSignup {
    /// Credentials for the new identity provider account.
    pub credentials: Credentials,
    /// Profile record to write once the account exists.
    pub profile: ProfileRecord,
}

impl ValidatedSignup {
    /// Returns the password secret.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.credentials.password
    }
}

/// Why a signup submission did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    /// One or more fields are invalid.
    #[error("the form has invalid fields")]
    Invalid,
    /// A submission is already running.
    #[error("a submission is already in progress")]
    InProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SignupStates {
    name: FieldState,
    first_name: FieldState,
    email: FieldState,
    phone: FieldState,
    password: FieldState,
    confirm_password: FieldState,
    terms: FieldState,
}

impl SignupStates {
    const fn get(&self, field: SignupField) -> &FieldState {
        match field {
            SignupField::Name => &self.name,
            SignupField::FirstName => &self.first_name,
            SignupField::Email => &self.email,
            SignupField::Phone => &self.phone,
            SignupField::Password => &self.password,
            SignupField::ConfirmPassword => &self.confirm_password,
            SignupField::Terms => &self.terms,
        }
    }

    const fn get_mut(&mut self, field: SignupField) -> &mut FieldState {
        match field {
            SignupField::Name => &mut self.name,
            SignupField::FirstName => &mut self.first_name,
            SignupField::Email => &mut self.email,
            SignupField::Phone => &mut self.phone,
            SignupField::Password => &mut self.password,
            SignupField::ConfirmPassword => &mut self.confirm_password,
            SignupField::Terms => &mut self.terms,
        }
    }
}

/// Signup form state: entered values, per-field validation and the loading
/// flag that blocks duplicate submissions.
///
/// # Example
///
/// ```
/// use chatboxt_core::{FormStatus, SignupField, SignupForm};
///
/// let mut form = SignupForm::new();
/// form.change(SignupField::Phone, "0012345678");
/// assert_eq!(form.messages(SignupField::Phone), vec!["Numéro de téléphone invalide"]);
/// assert_eq!(form.status(), FormStatus::Blocked);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    values: SignupValues,
    states: SignupStates,
    loading: bool,
}

impl SignupForm {
    /// Create an empty form with every field untouched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form pre-filled with `values`, every field untouched.
    #[must_use]
    pub fn with_values(values: SignupValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Current values.
    #[must_use]
    pub const fn values(&self) -> &SignupValues {
        &self.values
    }

    /// Update a field value and revalidate it.
    ///
    /// For [`SignupField::Terms`] any value other than empty, `"false"` or
    /// `"off"` counts as checked. Changing the password also revalidates the
    /// confirmation once that field has been touched.
    pub fn change(&mut self, field: SignupField, value: &str) {
        match field {
            SignupField::Name => value.clone_into(&mut self.values.name),
            SignupField::FirstName => value.clone_into(&mut self.values.first_name),
            SignupField::Email => value.clone_into(&mut self.values.email),
            SignupField::Phone => value.clone_into(&mut self.values.phone),
            SignupField::Password => value.clone_into(&mut self.values.password),
            SignupField::ConfirmPassword => value.clone_into(&mut self.values.confirm_password),
            SignupField::Terms => self.values.terms = checkbox_checked(value),
        }

        self.blur(field);

        if field == SignupField::Password
            && *self.states.get(SignupField::ConfirmPassword) != FieldState::Untouched
        {
            self.blur(SignupField::ConfirmPassword);
        }
    }

    /// Validate a field without changing its value.
    pub fn blur(&mut self, field: SignupField) {
        *self.states.get_mut(field) = self.values.validate(field);
    }

    /// Validate every field and return the aggregate status.
    pub fn validate_all(&mut self) -> FormStatus {
        for field in SignupField::ALL {
            self.blur(field);
        }
        self.status()
    }

    /// Aggregate status from the current field states.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        FormStatus::from_states(SignupField::ALL.into_iter().map(|f| self.states.get(f)))
    }

    /// Validation state of one field.
    #[must_use]
    pub const fn state(&self, field: SignupField) -> &FieldState {
        self.states.get(field)
    }

    /// Messages to display under a field; empty when the field is valid or
    /// untouched.
    #[must_use]
    pub fn messages(&self, field: SignupField) -> Vec<String> {
        self.states
            .get(field)
            .error()
            .map(|error| field.messages(error))
            .unwrap_or_default()
    }

    /// Strength of the current password value.
    #[must_use]
    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::evaluate(&self.values.password)
    }

    /// Whether a submission is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validate every field and, if the form is ready, set the loading flag
    /// and return the typed submission.
    ///
    /// # Errors
    ///
    /// Returns `SubmitBlocked::InProgress` while a previous submission is
    /// running and `SubmitBlocked::Invalid` if any field fails validation.
    pub fn begin_submission(&mut self) -> Result<ValidatedSignup, SubmitBlocked> {
        if self.loading {
            return Err(SubmitBlocked::InProgress);
        }

        if !self.validate_all().is_ready() {
            return Err(SubmitBlocked::Invalid);
        }

        let signup = self.values.parse().ok_or(SubmitBlocked::Invalid)?;
        self.loading = true;
        Ok(signup)
    }

    /// Clear the loading flag once the submission has finished, whatever its
    /// outcome.
    pub const fn finish_submission(&mut self) {
        self.loading = false;
    }
}

/// Whether a posted checkbox value counts as checked.
///
/// Browsers omit unchecked boxes entirely; any value other than empty,
/// `"false"` or `"off"` is treated as checked.
#[must_use]
pub fn checkbox_checked(value: &str) -> bool {
    !matches!(value, "" | "false" | "off")
}
