//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod compile;
mod submit;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bolt_core::domain::workflow::WorkflowRequest;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a request into an Argo Workflow and print it
    Compile {
        /// Path to the request JSON file
        file: String,

        /// Pretty-print the document
        #[arg(long)]
        pretty: bool,
    },
    /// Compile a request and create the workflow in the cluster
    Submit {
        /// Path to the request JSON file
        file: String,

        /// Kubeconfig to use instead of the inferred cluster configuration
        #[arg(long)]
        kubeconfig: Option<PathBuf>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let compiler = config.compiler()?;

    match command {
        Commands::Compile { file, pretty } => {
            compile::handle_compile(&read_request(Path::new(&file))?, &compiler, pretty)
        }
        Commands::Submit { file, kubeconfig } => {
            submit::handle_submit(
                &read_request(Path::new(&file))?,
                &compiler,
                kubeconfig.as_deref(),
            )
            .await
        }
    }
}

/// Read a workflow request from a JSON file
fn read_request(path: &Path) -> Result<WorkflowRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid workflow request in {}", path.display()))
}
