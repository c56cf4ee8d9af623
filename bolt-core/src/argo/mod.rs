//! Argo Workflow document model
//!
//! The in-memory shape of the compiled workflow. Serialization to the wire
//! format is a plain `serde_json::to_value` of [`ExecutionDocument`].

pub mod types;

pub use types::ExecutionDocument;
