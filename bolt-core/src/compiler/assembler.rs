//! Document assembly
//!
//! Stitches the entrypoint pipeline, the execution DAG and the rendered stage
//! templates into one Argo Workflow.

use std::collections::BTreeMap;

use crate::argo::types::{
    API_VERSION, Affinity, DagTask, DagTemplate, ExecutionDocument, KIND, NodeAffinity,
    NodeSelector, NodeSelectorRequirement, NodeSelectorTerm, SecretVolumeSource, Template, Volume,
    WorkflowMetadata, WorkflowSpec, WorkflowStep,
};
use crate::domain::stage::StageKind;
use crate::domain::workflow::WorkflowRequest;

use super::config::CompilerConfig;
use super::naming::run_name;
use super::renderer::{BUILD_TEMPLATE, REGISTRY_VOLUME, SSH_VOLUME};
use super::selector::StageSelection;

pub const MAIN_TEMPLATE: &str = "main";
pub const EXECUTION_TEMPLATE: &str = "execution";

pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY: &str = "bolt";

// Request ids are free-form, so they go in annotations rather than labels
pub const ANNOTATION_TENANT_ID: &str = "bolt/tenant-id";
pub const ANNOTATION_PROJECT_ID: &str = "bolt/project-id";
pub const ANNOTATION_EXECUTION_ID: &str = "bolt/execution-id";

/// Owner-only read permission for the ssh key
const SSH_DEFAULT_MODE: u32 = 0o600;

/// Assemble the workflow document
///
/// `stage_templates` holds the rendered application stages in emission order;
/// `build` is the rendered build template.
pub fn assemble(
    request: &WorkflowRequest,
    selection: &StageSelection,
    tasks: Vec<DagTask>,
    build: Template,
    stage_templates: Vec<Template>,
    config: &CompilerConfig,
) -> ExecutionDocument {
    let mut templates = Vec::with_capacity(stage_templates.len() + 3);
    templates.push(main_template());
    templates.push(execution_template(tasks));
    templates.push(build);
    templates.extend(stage_templates);

    let on_exit = selection
        .contains(StageKind::PostStop)
        .then(|| StageKind::PostStop.template_name().to_string());

    ExecutionDocument {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: WorkflowMetadata {
            name: run_name(),
            namespace: config.namespace.clone(),
            labels: BTreeMap::from([(LABEL_MANAGED_BY.to_string(), MANAGED_BY.to_string())]),
            annotations: BTreeMap::from([
                (ANNOTATION_TENANT_ID.to_string(), request.tenant_id.clone()),
                (ANNOTATION_PROJECT_ID.to_string(), request.project_id.clone()),
                (ANNOTATION_EXECUTION_ID.to_string(), request.execution_id.clone()),
            ]),
        },
        spec: WorkflowSpec {
            entrypoint: MAIN_TEMPLATE.to_string(),
            templates,
            volumes: volumes(config),
            service_account_name: config.service_account.clone(),
            affinity: affinity(config),
            on_exit,
        },
    }
}

/// Two sequential steps: build the image, then run the DAG
fn main_template() -> Template {
    Template {
        name: MAIN_TEMPLATE.to_string(),
        steps: Some(vec![
            vec![WorkflowStep {
                name: BUILD_TEMPLATE.to_string(),
                template: BUILD_TEMPLATE.to_string(),
            }],
            vec![WorkflowStep {
                name: EXECUTION_TEMPLATE.to_string(),
                template: EXECUTION_TEMPLATE.to_string(),
            }],
        ]),
        ..Default::default()
    }
}

fn execution_template(tasks: Vec<DagTask>) -> Template {
    Template {
        name: EXECUTION_TEMPLATE.to_string(),
        dag: Some(DagTemplate { tasks }),
        ..Default::default()
    }
}

fn volumes(config: &CompilerConfig) -> Vec<Volume> {
    vec![
        Volume {
            name: SSH_VOLUME.to_string(),
            secret: SecretVolumeSource {
                secret_name: config.ssh_secret_name.clone(),
                default_mode: Some(SSH_DEFAULT_MODE),
            },
        },
        Volume {
            name: REGISTRY_VOLUME.to_string(),
            secret: SecretVolumeSource {
                secret_name: config.registry_secret_name.clone(),
                default_mode: None,
            },
        },
    ]
}

/// Keep workflow pods on pool-labelled nodes
fn affinity(config: &CompilerConfig) -> Option<Affinity> {
    let pools = config.node_pools.as_ref()?;

    Some(Affinity {
        node_affinity: NodeAffinity {
            required_during_scheduling_ignored_during_execution: NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: vec![NodeSelectorRequirement {
                        key: pools.label.clone(),
                        operator: "In".to_string(),
                        values: vec![pools.master.clone(), pools.worker.clone()],
                    }],
                }],
            },
        },
    })
}
