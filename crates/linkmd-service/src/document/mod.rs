//! Document lifecycle: archive, create, update, rename, move, copy, split, delete.

pub mod import;
pub mod service;
pub mod split;

pub use crate::package::UploadFile;
pub use service::DocumentService;
