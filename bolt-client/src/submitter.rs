//! Workflow submission seam

use async_trait::async_trait;
use bolt_core::argo::ExecutionDocument;
use bolt_core::dto::workflow::WorkflowCreated;

use crate::ArgoClient;
use crate::error::Result;

/// Hands a compiled workflow to the orchestrator
///
/// Failures are returned as-is; submission is never retried here.
#[async_trait]
pub trait WorkflowSubmitter: Send + Sync {
    async fn submit(&self, document: &ExecutionDocument) -> Result<WorkflowCreated>;
}

#[async_trait]
impl WorkflowSubmitter for ArgoClient {
    async fn submit(&self, document: &ExecutionDocument) -> Result<WorkflowCreated> {
        self.create_workflow(document).await
    }
}
