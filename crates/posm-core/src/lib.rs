//! Domain model of the POSM survey client.
//!
//! This crate has no I/O. Network and storage access go through the
//! [`transport::Transport`] and [`session::CredentialStore`] ports.

pub mod catalog;
pub mod error;
pub mod session;
pub mod store;
pub mod suggest;
pub mod survey;
pub mod transport;

// Re-export common error types
pub use error::{Result, SurveyError, ValidationError};
