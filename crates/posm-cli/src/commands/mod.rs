pub mod context;
pub mod search;
pub mod session;
pub mod submit;
