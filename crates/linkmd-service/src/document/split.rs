//! Heading statistics and document splitting.

use std::collections::BTreeMap;

use tracing::info;

use linkmd_core::result::AppResult;
use linkmd_core::types::DocumentId;
use linkmd_entity::document::{DocumentSummary, HeadingStats, SplitOutcome};

use super::service::DocumentService;
use crate::naming;
use crate::split;

impl DocumentService {
    /// Number of headings per level (1-6), omitting empty levels.
    pub async fn heading_stats(&self, id: DocumentId) -> AppResult<HeadingStats> {
        let doc = self.find(id).await?;
        let mut stats = BTreeMap::new();
        for heading in doc.heading_tree.iter() {
            *stats.entry(heading.level).or_insert(0usize) += 1;
        }
        Ok(HeadingStats {
            doc_id: doc.id,
            title: doc.title,
            stats,
        })
    }

    /// Splits a document into one new document per section at `level`.
    ///
    /// Chunks land in the source document's folder and inherit its tags.
    /// The source is deleted afterwards unless `keep_original` is set.
    pub async fn split_document(
        &self,
        id: DocumentId,
        level: u8,
        keep_original: bool,
    ) -> AppResult<SplitOutcome> {
        let doc = self.find(id).await?;
        let chunks = split::plan(&doc.content, level)?;

        let arena = self.resolver.load(doc.project_id).await?;
        let base = naming::stem(&doc.filename, self.extension()).to_string();
        let mut created = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            let title = naming::safe_title(chunk.title(), self.config.split_title_max_chars);
            let stem = naming::split_stem(&base, i + 1, &title);
            let filename = self
                .unique_filename(
                    doc.project_id,
                    doc.folder_id,
                    format!("{stem}.{}", self.extension()),
                    &stem,
                )
                .await?;

            let part = self
                .store_new(&arena, doc.folder_id, filename, chunk.render(level))
                .await?;
            self.replicate_tags(id, part.id).await?;
            created.push(DocumentSummary::from(&part));
        }

        if !keep_original {
            self.delete_document(id).await?;
        }
        self.project_repo.refresh_doc_count(doc.project_id).await?;

        info!(
            document_id = %id,
            level,
            chunks = created.len(),
            kept = keep_original,
            "Document split"
        );
        Ok(SplitOutcome {
            original_id: id,
            kept: keep_original,
            created,
        })
    }
}
