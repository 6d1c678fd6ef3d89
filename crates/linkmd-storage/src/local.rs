//! Local filesystem mirror provider.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::traits::mirror::MirrorProvider;

/// Physical mirror rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    /// Root directory of the mirror.
    root: PathBuf,
}

impl LocalMirror {
    /// Create a mirror rooted at the given path, creating the root if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create mirror root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The mirror root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a mirror-relative path to an absolute path inside the root.
    ///
    /// Paths that would climb out of the root are rejected.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Mirror path escapes the root: {path}"
                    )));
                }
            }
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn io_error(e: std::io::Error, action: &str, path: &str) -> AppError {
    if e.kind() == IoErrorKind::NotFound {
        AppError::not_found(format!("Mirror path not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl MirrorProvider for LocalMirror {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| io_error(e, "read file", path))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data)
            .await
            .map_err(|e| io_error(e, "write file", path))?;

        debug!(path, bytes = data.len(), "Wrote mirror file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted mirror file");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e, "delete file", path)),
        }
    }

    async fn delete_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        if full_path == self.root {
            return Err(AppError::validation("Refusing to delete the mirror root"));
        }
        match fs::remove_dir_all(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted mirror directory");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e, "delete directory", path)),
        }
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                AppError::not_found(format!("Mirror path not found: {from}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to rename {from} -> {to}"),
                    e,
                )
            }
        })?;

        debug!(from, to, "Renamed mirror entry");
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path)
            .await
            .map_err(|e| io_error(e, "stat", path))
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path)
            .await
            .map_err(|e| io_error(e, "create directory", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn mirror() -> (tempfile::TempDir, LocalMirror) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalMirror::new(dir.path()).await.unwrap();
        (dir, mirror)
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_reads_back() {
        let (_dir, mirror) = mirror().await;
        mirror
            .write("p1/Docs/Sub/a.md", Bytes::from("# A"))
            .await
            .unwrap();

        assert!(mirror.exists("p1/Docs/Sub").await.unwrap());
        let data = mirror.read_bytes("p1/Docs/Sub/a.md").await.unwrap();
        assert_eq!(data, Bytes::from("# A"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let (_dir, mirror) = mirror().await;
        mirror.delete("nope.md").await.unwrap();
        mirror.delete_dir("p1/nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_directory_moves_contents() {
        let (_dir, mirror) = mirror().await;
        mirror.write("p1/Docs/a.md", Bytes::from("a")).await.unwrap();
        mirror.rename("p1/Docs", "p1/Archive/Guides").await.unwrap();

        assert!(!mirror.exists("p1/Docs").await.unwrap());
        assert!(mirror.exists("p1/Archive/Guides/a.md").await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_missing_source_is_not_found() {
        let (_dir, mirror) = mirror().await;
        let err = mirror.rename("p1/missing", "p1/other").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_dir_is_idempotent() {
        let (_dir, mirror) = mirror().await;
        mirror.create_dir("p1/Docs").await.unwrap();
        mirror.create_dir("p1/Docs").await.unwrap();
        assert!(mirror.exists("p1/Docs").await.unwrap());
    }

    #[tokio::test]
    async fn test_paths_cannot_escape_root() {
        let (_dir, mirror) = mirror().await;
        let err = mirror
            .write("../outside.md", Bytes::from("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(mirror.delete_dir("").await.is_err());
    }
}
