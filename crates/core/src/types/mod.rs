//! Core types for chatboXt.
//!
//! This module provides type-safe wrappers for the values collected by the
//! login and signup forms.

pub mod email;
pub mod id;
pub mod name;
pub mod password;
pub mod phone;
pub mod profile;

pub use email::{Email, EmailError};
pub use id::AccountId;
pub use name::{NameError, PersonName};
pub use password::{Password, PasswordCriterion, PasswordError, PasswordStrength};
pub use phone::{PhoneError, PhoneNumber};
pub use profile::{Credentials, ProfileRecord};
