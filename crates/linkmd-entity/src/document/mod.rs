//! Document domain entities.

pub mod analysis;
pub mod model;

pub use analysis::{DocumentAnalysis, HeadingEntry};
pub use model::{
    Document, DocumentSummary, DocumentWithTags, FolderScope, HeadingStats, NewDocument,
    SplitOutcome,
};
