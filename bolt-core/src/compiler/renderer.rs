//! Template rendering
//!
//! Produces the fully specified Argo template of each selected stage: image,
//! command, environment, resources, placement, daemon flag, retries and
//! deadline. Rendering dispatches on [`StageKind`] so every stage has exactly
//! one rendering path.

use std::collections::BTreeMap;

use crate::argo::types::{
    Container, EnvVar, Inputs, Outputs, Parameter, RetryStrategy, Template, ValueFrom,
    VolumeMount,
};
use crate::domain::stage::StageKind;
use crate::domain::workflow::WorkflowRequest;

use super::config::CompilerConfig;
use super::wiring::MASTER_IP_PARAM;

pub const ENV_EXECUTION_ID: &str = "BOLT_EXECUTION_ID";
pub const ENV_CALLBACK_URL: &str = "BOLT_CALLBACK_URL";
pub const ENV_AUTH_TOKEN: &str = "BOLT_AUTH_TOKEN";
pub const ENV_WORKER_TYPE: &str = "BOLT_WORKER_TYPE";
pub const ENV_USERS: &str = "BOLT_USERS";
pub const ENV_WORKERS: &str = "BOLT_WORKERS";
pub const ENV_DURATION_SECONDS: &str = "BOLT_DURATION_SECONDS";
pub const ENV_MASTER_HOST: &str = "BOLT_MASTER_HOST";
pub const ENV_HOST: &str = "BOLT_HOST";
pub const ENV_PORT: &str = "BOLT_PORT";

/// Names the compiler injects; user env vars may not shadow them
pub const RESERVED_ENV_VARS: [&str; 10] = [
    ENV_EXECUTION_ID,
    ENV_CALLBACK_URL,
    ENV_AUTH_TOKEN,
    ENV_WORKER_TYPE,
    ENV_USERS,
    ENV_WORKERS,
    ENV_DURATION_SECONDS,
    ENV_MASTER_HOST,
    ENV_HOST,
    ENV_PORT,
];

pub const BUILD_TEMPLATE: &str = "build";

/// Build output holding the pushed image reference
const IMAGE_OUTPUT: &str = "image";
const IMAGE_OUTPUT_PATH: &str = "/tmp/image.txt";

pub const SSH_VOLUME: &str = "ssh";
pub const REGISTRY_VOLUME: &str = "kaniko-secret";

/// Render the template of one application stage
pub fn render(kind: StageKind, request: &WorkflowRequest, config: &CompilerConfig) -> Template {
    let load_tests = request.job_load_tests.is_some();

    match kind {
        StageKind::PreStart | StageKind::PostStop => Template {
            container: Some(container(kind, request, config, system_env(request, config))),
            node_selector: worker_pool(config),
            ..base(kind, config)
        },
        StageKind::Monitoring => {
            let mut env = system_env(request, config);
            if load_tests {
                env.push(master_host_env());
            }
            Template {
                inputs: load_tests.then(master_ip_input),
                // Stays alive for the whole coordinated run
                daemon: load_tests,
                container: Some(container(kind, request, config, env)),
                node_selector: worker_pool(config),
                active_deadline_seconds: Some(deadline(request, config)),
                ..base(kind, config)
            }
        }
        StageKind::LoadTestsMaster => Template {
            daemon: true,
            container: Some(container(kind, request, config, load_test_env(kind, request, config))),
            node_selector: master_pool(config),
            active_deadline_seconds: Some(deadline(request, config)),
            ..base(kind, config)
        },
        StageKind::LoadTestsSlave => Template {
            inputs: Some(master_ip_input()),
            container: Some(container(kind, request, config, load_test_env(kind, request, config))),
            node_selector: worker_pool(config),
            active_deadline_seconds: Some(deadline(request, config)),
            ..base(kind, config)
        },
    }
}

/// Render the build template producing the run's image
pub fn render_build(request: &WorkflowRequest, config: &CompilerConfig) -> Template {
    let env = vec![
        EnvVar::new(
            "GOOGLE_APPLICATION_CREDENTIALS",
            "/etc/kaniko/kaniko-secret.json",
        ),
        EnvVar::new("CLOUDSDK_CORE_PROJECT", &config.gcp_project),
        EnvVar::new("TENANT_ID", &request.tenant_id),
        EnvVar::new("PROJECT_ID", &request.project_id),
        EnvVar::new("REPOSITORY_URL", &request.repository_url),
        EnvVar::new("BRANCH", &request.branch),
        EnvVar::new("REDIS_URL", &config.redis_url),
        EnvVar::new("NO_CACHE", request.no_cache.to_string()),
    ];

    Template {
        name: BUILD_TEMPLATE.to_string(),
        container: Some(Container {
            image: config.builder_image.clone(),
            image_pull_policy: Some("Always".to_string()),
            env,
            volume_mounts: vec![
                VolumeMount {
                    name: SSH_VOLUME.to_string(),
                    mount_path: "/root/.ssh".to_string(),
                },
                VolumeMount {
                    name: REGISTRY_VOLUME.to_string(),
                    mount_path: "/etc/kaniko".to_string(),
                },
            ],
            ..Default::default()
        }),
        outputs: Some(Outputs {
            parameters: vec![Parameter {
                name: IMAGE_OUTPUT.to_string(),
                global_name: Some(IMAGE_OUTPUT.to_string()),
                value_from: Some(ValueFrom {
                    path: IMAGE_OUTPUT_PATH.to_string(),
                }),
                ..Default::default()
            }],
        }),
        ..Default::default()
    }
}

fn base(kind: StageKind, config: &CompilerConfig) -> Template {
    Template {
        name: kind.template_name().to_string(),
        retry_strategy: config
            .profiles
            .get(kind)
            .retry_limit
            .map(|limit| RetryStrategy { limit }),
        ..Default::default()
    }
}

/// User vars first, then the system pairs
fn container(
    kind: StageKind,
    request: &WorkflowRequest,
    config: &CompilerConfig,
    system: Vec<EnvVar>,
) -> Container {
    let profile = config.profiles.get(kind);

    let mut env: Vec<EnvVar> = request
        .env_vars_for(kind)
        .into_iter()
        .flatten()
        .map(|(name, value)| EnvVar::new(name, value))
        .collect();
    env.extend(system);

    Container {
        image: profile.image.clone(),
        command: profile.command.clone(),
        args: profile.args.clone(),
        env,
        resources: Some(profile.resources()),
        ..Default::default()
    }
}

fn system_env(request: &WorkflowRequest, config: &CompilerConfig) -> Vec<EnvVar> {
    vec![
        EnvVar::new(ENV_EXECUTION_ID, &request.execution_id),
        EnvVar::new(ENV_CALLBACK_URL, &config.callback_url),
        EnvVar::new(ENV_AUTH_TOKEN, &request.auth_token),
    ]
}

fn load_test_env(kind: StageKind, request: &WorkflowRequest, config: &CompilerConfig) -> Vec<EnvVar> {
    let mut env = system_env(request, config);
    let role = match kind {
        StageKind::LoadTestsMaster => "master",
        _ => "slave",
    };
    env.push(EnvVar::new(ENV_WORKER_TYPE, role));

    if let Some(load_tests) = &request.job_load_tests {
        env.push(EnvVar::new(ENV_USERS, load_tests.users.to_string()));
        env.push(EnvVar::new(ENV_WORKERS, load_tests.workers.to_string()));
        env.push(EnvVar::new(
            ENV_DURATION_SECONDS,
            request.duration_seconds.to_string(),
        ));
        if kind == StageKind::LoadTestsSlave {
            env.push(master_host_env());
        }
        if let Some(host) = &load_tests.host {
            env.push(EnvVar::new(ENV_HOST, host));
        }
        if let Some(port) = load_tests.port {
            env.push(EnvVar::new(ENV_PORT, port.to_string()));
        }
    }

    env
}

fn master_host_env() -> EnvVar {
    EnvVar::new(
        ENV_MASTER_HOST,
        format!("{{{{inputs.parameters.{}}}}}", MASTER_IP_PARAM),
    )
}

fn master_ip_input() -> Inputs {
    Inputs {
        parameters: vec![Parameter::named(MASTER_IP_PARAM)],
    }
}

fn deadline(request: &WorkflowRequest, config: &CompilerConfig) -> u64 {
    u64::try_from(request.duration_seconds)
        .unwrap_or(0)
        .saturating_add(config.deadline_grace_seconds)
}

fn master_pool(config: &CompilerConfig) -> BTreeMap<String, String> {
    config
        .node_pools
        .as_ref()
        .map(|pools| BTreeMap::from([(pools.label.clone(), pools.master.clone())]))
        .unwrap_or_default()
}

fn worker_pool(config: &CompilerConfig) -> BTreeMap<String, String> {
    config
        .node_pools
        .as_ref()
        .map(|pools| BTreeMap::from([(pools.label.clone(), pools.worker.clone())]))
        .unwrap_or_default()
}
