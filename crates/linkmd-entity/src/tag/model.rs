//! Tag entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag that can be attached to many documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Tag identifier.
    pub id: i64,
    /// Unique tag name.
    pub name: String,
    /// Display color.
    pub color: String,
}
