//! Credentials and the profile record written at signup.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::{Email, PersonName, PhoneNumber};

/// Email and password submitted to the identity provider.
///
/// Lives only for the duration of a submit.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Email as entered.
    pub email: String,
    /// Password as entered.
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials from raw form values.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Profile fields stored in the document store under `users/{accountId}`.
///
/// Field names are serialized in camelCase (`firstName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Last name.
    pub name: PersonName,
    /// First name.
    pub first_name: PersonName,
    /// Email address used for the account.
    pub email: Email,
    /// Phone number.
    pub phone: PhoneNumber,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_profile_serializes_with_camel_case_keys() {
        let profile = ProfileRecord {
            name: PersonName::parse("Curie").unwrap(),
            first_name: PersonName::parse("Marie").unwrap(),
            email: Email::parse("marie@example.fr").unwrap(),
            phone: PhoneNumber::parse("0612345678").unwrap(),
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Curie",
                "firstName": "Marie",
                "email": "marie@example.fr",
                "phone": "0612345678",
            })
        );
    }

    #[test]
    fn test_credentials_hide_password() {
        let credentials = Credentials::new("marie@example.fr", "Abcdef1!");
        assert!(!format!("{credentials:?}").contains("Abcdef1!"));
        assert_eq!(credentials.password.expose_secret(), "Abcdef1!");
    }
}
