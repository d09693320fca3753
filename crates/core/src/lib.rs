//! chatboXt Core - Validated types and form state.
//!
//! This crate provides the types shared by the chatboXt web application:
//! - validated field newtypes (`Email`, `PhoneNumber`, `PersonName`, `Password`)
//! - the profile record written to the document store at signup
//! - per-field validation state for the login and signup forms
//!
//! # Architecture
//!
//! The core crate contains only types and validation logic - no I/O, no HTTP
//! clients, no identity provider calls. The web crate drives these types from
//! its request handlers.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, phones, names, passwords and IDs
//! - [`forms`] - Field state machine and the login/signup form models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod types;

pub use forms::*;
pub use types::*;
