//! Service Module
//!
//! Business logic layer for the API.
//! Services compile requests and hand the documents to the submitter.

pub mod workflow;

// Re-export for convenience
pub use workflow as workflow_service;
