//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder};
pub use tree::{DocumentLeaf, FolderNode, TreeNode};
