//! Workflow API Handlers
//!
//! HTTP endpoints for compiling and launching load-test workflows.

use axum::{Json, extract::State};
use bolt_core::argo::ExecutionDocument;
use bolt_core::domain::workflow::WorkflowRequest;
use bolt_core::dto::workflow::WorkflowCreated;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::workflow_service;

/// POST /workflows
/// Compile a request and create the workflow in the cluster
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(req): Json<WorkflowRequest>,
) -> ApiResult<Json<WorkflowCreated>> {
    tracing::info!(
        "Creating workflow for execution {} (tenant {}, project {})",
        req.execution_id,
        req.tenant_id,
        req.project_id
    );

    let created =
        workflow_service::create_workflow(&state.config, state.submitter.as_ref(), &req).await?;

    Ok(Json(created))
}

/// POST /workflows/compile
/// Compile a request without submitting it
pub async fn compile_workflow(
    State(state): State<AppState>,
    Json(req): Json<WorkflowRequest>,
) -> ApiResult<Json<ExecutionDocument>> {
    tracing::debug!("Compiling workflow for execution {}", req.execution_id);

    let document = workflow_service::compile_workflow(&state.config, &req)?;

    Ok(Json(document))
}
