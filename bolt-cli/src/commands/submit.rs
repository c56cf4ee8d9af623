//! Submit command handler
//!
//! Compiles a request and creates the workflow through the Kubernetes API.

use std::path::Path;

use anyhow::{Context, Result};
use bolt_client::{ArgoClient, WorkflowSubmitter};
use bolt_core::domain::workflow::WorkflowRequest;
use bolt_core::{CompilerConfig, compile};
use colored::*;

pub async fn handle_submit(
    request: &WorkflowRequest,
    config: &CompilerConfig,
    kubeconfig: Option<&Path>,
) -> Result<()> {
    let document = compile(request, config).context("Failed to compile workflow")?;

    let client = match kubeconfig {
        Some(path) => ArgoClient::from_kubeconfig(path).await?,
        None => ArgoClient::try_default().await?,
    };

    let created = match client.submit(&document).await {
        Ok(created) => created,
        Err(e) if e.is_conflict() => {
            anyhow::bail!(
                "Workflow {} already exists, submit again for a fresh name",
                document.metadata.name
            )
        }
        Err(e) => return Err(e).context("Failed to submit workflow"),
    };

    println!("{}", "✓ Workflow submitted successfully!".green().bold());
    println!("  Name:      {}", created.name.cyan());
    println!(
        "  Namespace: {}",
        created
            .namespace
            .as_deref()
            .unwrap_or(&document.metadata.namespace)
            .bold()
    );
    if let Some(uid) = &created.uid {
        println!("  UID:       {}", uid.dimmed());
    }
    if let Some(created_at) = created.creation_timestamp {
        println!("  Created:   {}", created_at.to_rfc3339().dimmed());
    }

    Ok(())
}
