//! Mirror reconciliation.

pub mod service;

pub use service::{ReconcileReport, ReconcileService};
