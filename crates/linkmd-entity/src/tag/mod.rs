//! Tag entities owned by the tagging collaborator.

pub mod model;

pub use model::Tag;
