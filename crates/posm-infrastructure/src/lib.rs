//! Infrastructure adapters for the POSM survey client: HTTP transport,
//! credential and image files, configuration and paths.

pub mod config;
pub mod http;
pub mod paths;
pub mod storage;

pub use crate::config::ClientConfig;
pub use crate::http::ReqwestTransport;
pub use crate::paths::PosmPaths;
pub use crate::storage::{load_image, FileCredentialStore};
