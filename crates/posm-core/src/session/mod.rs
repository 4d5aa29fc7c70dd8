//! Session domain module.
//!
//! Cached credentials of the signed-in surveyor and the storage port that
//! persists them between runs.
//!
//! # Module Structure
//!
//! - `model`: `Session`, `User` and token types
//! - `store`: `CredentialStore` trait and the in-memory implementation

mod model;
mod store;

// Re-export public API
pub use model::{Session, TokenPair, User, ADMIN_ROLE};
pub use store::{CredentialStore, InMemoryCredentialStore};
