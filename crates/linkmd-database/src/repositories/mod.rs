//! Repository implementations for the tree store.

pub mod document;
pub mod folder;
pub mod project;
pub mod tag;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
pub use project::ProjectRepository;
pub use tag::TagRepository;
