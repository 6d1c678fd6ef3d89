//! Project tree building and display ordering.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_database::repositories::{DocumentRepository, FolderRepository, ProjectRepository};
use linkmd_entity::document::{Document, FolderScope};
use linkmd_entity::folder::{DocumentLeaf, FolderNode, TreeNode};

use crate::paths::FolderArena;

/// Builds nested project trees.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Document repository.
    document_repo: Arc<DocumentRepository>,
    /// Project repository.
    project_repo: Arc<ProjectRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        document_repo: Arc<DocumentRepository>,
        project_repo: Arc<ProjectRepository>,
    ) -> Self {
        Self {
            folder_repo,
            document_repo,
            project_repo,
        }
    }

    /// The full tree of a project: root-level folders and documents, nested.
    pub async fn get_project_tree(&self, project_id: ProjectId) -> AppResult<Vec<TreeNode>> {
        self.project_repo
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

        let folders = self.folder_repo.find_by_project(project_id).await?;
        let documents = self
            .document_repo
            .find_by_project(project_id, FolderScope::Any)
            .await?;

        Ok(build_tree(FolderArena::new(project_id, folders), documents))
    }
}

fn leaf(doc: Document) -> TreeNode {
    TreeNode::File(DocumentLeaf {
        id: doc.id,
        filename: doc.filename,
        title: doc.title,
        folder_id: doc.folder_id,
        file_size: doc.file_size,
        heading_count: doc.heading_count,
        code_block_count: doc.code_block_count,
    })
}

/// Assemble the nested tree bottom-up so no recursion is needed.
fn build_tree(arena: FolderArena, documents: Vec<Document>) -> Vec<TreeNode> {
    let mut contents: HashMap<Option<FolderId>, Vec<TreeNode>> = HashMap::new();
    for doc in documents {
        contents.entry(doc.folder_id).or_default().push(leaf(doc));
    }

    let mut order: Vec<FolderId> = Vec::with_capacity(arena.len());
    for root in arena.children(None) {
        order.extend(arena.subtree(*root));
    }

    // Reverse pre-order visits every child before its parent.
    for id in order.into_iter().rev() {
        let Ok(folder) = arena.get(id) else { continue };
        let mut children = contents.remove(&Some(id)).unwrap_or_default();
        sort_nodes(&mut children);
        let node = TreeNode::Folder(FolderNode {
            id,
            name: folder.name.clone(),
            parent_id: folder.parent_id,
            sort_order: folder.sort_order,
            children,
        });
        contents.entry(folder.parent_id).or_default().push(node);
    }

    let mut roots = contents.remove(&None).unwrap_or_default();
    sort_nodes(&mut roots);
    roots
}

/// Folders before documents, then natural case-insensitive name order.
pub fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| natural_cmp(a.name(), b.name()))
    });
}

/// Compare names so that `file2` sorts before `file10`, ignoring case.
/// Ties fall back to plain string order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.is_digits, y.is_digits) {
                    (true, true) => cmp_digits(x.text, y.text),
                    _ => x.text.to_lowercase().cmp(&y.text.to_lowercase()),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

struct Run<'a> {
    text: &'a str,
    is_digits: bool,
}

/// Splits a string into alternating digit and non-digit runs.
struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let is_digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != is_digits)
            .map_or(self.rest.len(), |(i, _)| i);
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Run { text, is_digits })
    }
}
