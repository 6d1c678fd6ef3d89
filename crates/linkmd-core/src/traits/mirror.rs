//! Physical mirror trait for the on-disk copy of the archive tree.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the physical mirror backend.
///
/// All paths are relative to the mirror root and use `/` as separator.
/// The mirror is a derived cache of the tree store: callers treat its
/// failures after a committed logical change as recoverable.
#[async_trait]
pub trait MirrorProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the mirror root is present and usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file, creating missing parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Delete a directory and all its contents. Missing directories are ignored.
    async fn delete_dir(&self, path: &str) -> AppResult<()>;

    /// Move a file or directory, creating the destination's parent directory.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Create a directory and any missing parents. Idempotent.
    async fn create_dir(&self, path: &str) -> AppResult<()>;
}
