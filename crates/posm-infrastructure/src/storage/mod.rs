//! Local file storage.

mod credential_file;
mod image_file;

pub use credential_file::FileCredentialStore;
pub use image_file::load_image;
