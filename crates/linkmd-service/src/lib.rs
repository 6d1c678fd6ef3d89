//! # linkmd-service
//!
//! The archive synchronizer. Each service validates tree invariants
//! against the tree store, commits the logical change, and then applies
//! the matching change to the physical mirror on a best-effort basis.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`ArchiveServices`] wires a
//! complete set from a pool, a mirror, and the archive configuration.

pub mod analysis;
pub mod document;
pub mod folder;
mod mirror;
pub mod naming;
pub mod package;
pub mod paths;
pub mod project;
pub mod reconcile;
pub mod services;
pub mod split;
pub mod traits;

pub use analysis::MarkdownAnalyzer;
pub use document::{DocumentService, UploadFile};
pub use folder::{FolderService, MAX_FOLDER_DEPTH, TreeService};
pub use paths::{FolderArena, PathResolver};
pub use project::ProjectService;
pub use reconcile::ReconcileService;
pub use services::ArchiveServices;
pub use traits::{ContentAnalyzer, TagStore};
