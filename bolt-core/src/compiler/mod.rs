//! Workflow compiler
//!
//! Maps a [`WorkflowRequest`] into an Argo Workflow in four steps:
//!
//! - `selector`: which stages the request includes
//! - `wiring`: the execution DAG between them, including slave fan-out
//! - `renderer`: one fully specified template per stage
//! - `assembler`: the final document with entrypoint and exit handler
//!
//! Compilation is pure apart from the random run name, so the same request
//! always yields the same document modulo `metadata.name`.

pub mod assembler;
pub mod config;
pub mod naming;
pub mod profile;
pub mod renderer;
pub mod selector;
pub mod validate;
pub mod wiring;

pub use config::{CompilerConfig, NodePools};
pub use profile::{StageProfile, StageProfiles};
pub use selector::StageSelection;

use tracing::debug;

use crate::argo::ExecutionDocument;
use crate::domain::workflow::WorkflowRequest;
use crate::error::Result;

/// Compile a workflow request into an Argo Workflow document
pub fn compile(request: &WorkflowRequest, config: &CompilerConfig) -> Result<ExecutionDocument> {
    validate::validate_request(request)?;

    let selection = selector::select(request)?;
    let tasks = wiring::wire(&selection);
    wiring::verify(&tasks)?;

    debug!(
        "Compiling execution {}: stages={:?}, slaves={}, tasks={}",
        request.execution_id,
        selection.kinds().collect::<Vec<_>>(),
        selection.slave_count(),
        tasks.len()
    );

    let templates = selection
        .kinds()
        .map(|kind| renderer::render(kind, request, config))
        .collect();
    let build = renderer::render_build(request, config);

    Ok(assembler::assemble(
        request, &selection, tasks, build, templates, config,
    ))
}
