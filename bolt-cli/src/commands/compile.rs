//! Compile command handler
//!
//! Prints the compiled document to stdout so it can be piped into
//! `argo submit -` or `kubectl create -f -`.

use anyhow::{Context, Result};
use bolt_core::domain::workflow::WorkflowRequest;
use bolt_core::{CompilerConfig, compile};

pub fn handle_compile(request: &WorkflowRequest, config: &CompilerConfig, pretty: bool) -> Result<()> {
    let document = compile(request, config).context("Failed to compile workflow")?;

    tracing::info!(
        "Compiled {} with {} templates",
        document.metadata.name,
        document.spec.templates.len()
    );

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", json);

    Ok(())
}
