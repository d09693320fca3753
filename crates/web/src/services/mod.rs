//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Login and signup against the identity provider and document store

pub mod auth;
