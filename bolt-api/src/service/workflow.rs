//! Workflow Service
//!
//! Compiles workflow requests and submits them to Argo.

use bolt_client::{ClientError, WorkflowSubmitter};
use bolt_core::argo::ExecutionDocument;
use bolt_core::domain::workflow::WorkflowRequest;
use bolt_core::dto::workflow::WorkflowCreated;
use bolt_core::{CompileError, CompilerConfig, compile};

/// Service error type
#[derive(Debug)]
pub enum WorkflowError {
    Compile(CompileError),
    Submission(ClientError),
}

impl From<CompileError> for WorkflowError {
    fn from(err: CompileError) -> Self {
        WorkflowError::Compile(err)
    }
}

impl From<ClientError> for WorkflowError {
    fn from(err: ClientError) -> Self {
        WorkflowError::Submission(err)
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Compile a request without submitting it
pub fn compile_workflow(config: &CompilerConfig, req: &WorkflowRequest) -> Result<ExecutionDocument> {
    let document = compile(req, config)?;

    tracing::debug!(
        "Compiled execution {} into {} ({} templates)",
        req.execution_id,
        document.metadata.name,
        document.spec.templates.len()
    );

    Ok(document)
}

/// Compile a request and create the workflow in the cluster
pub async fn create_workflow(
    config: &CompilerConfig,
    submitter: &dyn WorkflowSubmitter,
    req: &WorkflowRequest,
) -> Result<WorkflowCreated> {
    let document = compile_workflow(config, req)?;

    let created = submitter.submit(&document).await.inspect_err(|e| {
        tracing::warn!("Submitting workflow {} failed: {}", document.metadata.name, e);
    })?;

    tracing::info!(
        "Workflow created: {} for execution {}",
        created.name,
        req.execution_id
    );

    Ok(created)
}
