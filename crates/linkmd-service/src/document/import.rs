//! Bulk archiving of documents and packages.

use bytes::Bytes;
use tracing::info;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_entity::document::DocumentSummary;

use super::service::DocumentService;
use crate::naming;
use crate::package::{self, UploadFile};
use crate::paths::FolderArena;

/// Decode document bytes as UTF-8 text, dropping a byte-order mark.
fn decode(filename: &str, data: &Bytes) -> AppResult<String> {
    let text = std::str::from_utf8(data)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Document '{filename}' is not valid UTF-8"),
                e,
            )
        })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// An upload that passed validation and is ready to store.
struct PreparedEntry {
    filename: String,
    content: String,
}

impl DocumentService {
    /// Archives a batch of documents and packages into one folder.
    ///
    /// Every eligible package entry becomes its own document. All entries are
    /// validated before the first one is stored, so an invalid entry leaves
    /// both stores untouched. Filenames that already exist in the folder get
    /// a ` (n)` suffix. The project's document count is refreshed once at the
    /// end.
    pub async fn archive_documents(
        &self,
        project_id: ProjectId,
        files: Vec<UploadFile>,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<DocumentSummary>> {
        package::validate_uploads(&files, &self.config)?;
        let arena = self
            .resolve_target(folder_id, Some(project_id), project_id)
            .await?;

        let mut entries = Vec::new();
        for file in files {
            if file.is_package() {
                let config = self.config.clone();
                let extracted = tokio::task::spawn_blocking(move || package::extract(&file, &config))
                    .await
                    .map_err(|e| {
                        AppError::internal(format!("Package extraction task failed: {e}"))
                    })??;
                entries.extend(extracted);
            } else {
                entries.push(file);
            }
        }

        let prepared = entries
            .iter()
            .map(|entry| self.prepare_entry(entry))
            .collect::<AppResult<Vec<_>>>()?;

        let mut results = Vec::with_capacity(prepared.len());
        for entry in prepared {
            match self.store_entry(&arena, folder_id, entry).await {
                Ok(summary) => results.push(summary),
                Err(e) => {
                    self.project_repo.refresh_doc_count(project_id).await?;
                    return Err(e);
                }
            }
        }

        self.project_repo.refresh_doc_count(project_id).await?;
        info!(
            project_id = %project_id,
            documents = results.len(),
            "Archive batch completed"
        );
        Ok(results)
    }

    /// Archives one document from raw bytes.
    pub async fn archive_single_document(
        &self,
        project_id: ProjectId,
        filename: &str,
        data: Bytes,
        folder_id: Option<FolderId>,
    ) -> AppResult<DocumentSummary> {
        let arena = self
            .resolve_target(folder_id, Some(project_id), project_id)
            .await?;
        let entry = self.prepare_entry(&UploadFile::new(filename, data))?;
        let summary = self.store_entry(&arena, folder_id, entry).await?;
        self.project_repo.refresh_doc_count(project_id).await?;
        Ok(summary)
    }

    /// Normalize the filename and decode the content without touching
    /// either store.
    fn prepare_entry(&self, entry: &UploadFile) -> AppResult<PreparedEntry> {
        let filename = naming::document_filename(&entry.filename, self.extension())?;
        let content = decode(&filename, &entry.data)?;
        if content.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Document '{filename}' has no content"
            )));
        }
        Ok(PreparedEntry { filename, content })
    }

    async fn store_entry(
        &self,
        arena: &FolderArena,
        folder_id: Option<FolderId>,
        entry: PreparedEntry,
    ) -> AppResult<DocumentSummary> {
        let stem = naming::stem(&entry.filename, self.extension()).to_string();
        let filename = self
            .unique_filename(arena.project_id(), folder_id, entry.filename, &stem)
            .await?;

        let document = self
            .store_new(arena, folder_id, filename, entry.content)
            .await?;
        Ok(DocumentSummary::from(&document))
    }
}
