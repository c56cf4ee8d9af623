//! Request validation
//!
//! Rejects requests the compiler cannot turn into a valid graph. Runs before
//! stage selection so no partial document is ever produced.

use crate::domain::stage::StageKind;
use crate::domain::workflow::{EnvVars, WorkflowRequest};
use crate::error::ConfigurationError;

use super::renderer::RESERVED_ENV_VARS;

/// Slave task names are zero-padded to three digits
pub const MAX_WORKERS: i64 = 999;

pub fn validate_request(request: &WorkflowRequest) -> Result<(), ConfigurationError> {
    for (field, value) in [
        ("tenant_id", &request.tenant_id),
        ("project_id", &request.project_id),
        ("repository_url", &request.repository_url),
        ("branch", &request.branch),
        ("execution_id", &request.execution_id),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigurationError::EmptyField(field));
        }
    }

    if request.duration_seconds <= 0 {
        return Err(ConfigurationError::NonPositiveDuration(
            request.duration_seconds,
        ));
    }

    if let Some(load_tests) = &request.job_load_tests {
        if load_tests.workers < 0 {
            return Err(ConfigurationError::NegativeWorkers(load_tests.workers));
        }
        if load_tests.workers > MAX_WORKERS {
            return Err(ConfigurationError::TooManyWorkers {
                got: load_tests.workers,
                max: MAX_WORKERS,
            });
        }
        if load_tests.users < 0 {
            return Err(ConfigurationError::NegativeUsers(load_tests.users));
        }
        if let Some(port) = load_tests.port {
            if !(1..=65535).contains(&port) {
                return Err(ConfigurationError::InvalidPort(port));
            }
        }
    }

    // Load test vars are checked once, under the master
    for kind in [
        StageKind::PreStart,
        StageKind::PostStop,
        StageKind::Monitoring,
        StageKind::LoadTestsMaster,
    ] {
        if let Some(env_vars) = request.env_vars_for(kind) {
            validate_env_vars(kind, env_vars)?;
        }
    }

    Ok(())
}

fn validate_env_vars(stage: StageKind, env_vars: &EnvVars) -> Result<(), ConfigurationError> {
    for name in env_vars.keys() {
        if name.is_empty() || name.contains('=') || !name.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigurationError::InvalidEnvVarName {
                stage,
                name: name.clone(),
            });
        }
        if RESERVED_ENV_VARS.contains(&name.as_str()) {
            return Err(ConfigurationError::ReservedEnvVar {
                stage,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::tests::{load_tests, request};
    use crate::domain::workflow::MonitoringJob;

    #[test]
    fn test_valid_request() {
        let mut req = request();
        req.job_load_tests = Some(load_tests(2, 10));
        assert_eq!(validate_request(&req), Ok(()));
    }

    #[test]
    fn test_empty_execution_id() {
        let mut req = request();
        req.execution_id = "  ".to_string();
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::EmptyField("execution_id"))
        );
    }

    #[test]
    fn test_non_positive_duration() {
        let mut req = request();
        req.duration_seconds = 0;
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::NonPositiveDuration(0))
        );
    }

    #[test]
    fn test_negative_workers() {
        let mut req = request();
        req.job_load_tests = Some(load_tests(-1, 10));
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::NegativeWorkers(-1))
        );
    }

    #[test]
    fn test_too_many_workers() {
        let mut req = request();
        req.job_load_tests = Some(load_tests(1000, 10));
        assert!(matches!(
            validate_request(&req),
            Err(ConfigurationError::TooManyWorkers { got: 1000, .. })
        ));
    }

    #[test]
    fn test_zero_workers_is_legal() {
        let mut req = request();
        req.job_load_tests = Some(load_tests(0, 0));
        assert_eq!(validate_request(&req), Ok(()));
    }

    #[test]
    fn test_invalid_port() {
        let mut req = request();
        let mut job = load_tests(1, 1);
        job.port = Some(70000);
        req.job_load_tests = Some(job);
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::InvalidPort(70000))
        );
    }

    #[test]
    fn test_reserved_env_var() {
        let mut req = request();
        req.job_monitoring = Some(MonitoringJob {
            env_vars: [("BOLT_EXECUTION_ID".to_string(), "other".to_string())].into(),
        });
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::ReservedEnvVar {
                stage: StageKind::Monitoring,
                name: "BOLT_EXECUTION_ID".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_env_var_name() {
        let mut req = request();
        let mut job = load_tests(1, 1);
        job.env_vars.insert("A=B".to_string(), "1".to_string());
        req.job_load_tests = Some(job);
        assert_eq!(
            validate_request(&req),
            Err(ConfigurationError::InvalidEnvVarName {
                stage: StageKind::LoadTestsMaster,
                name: "A=B".to_string(),
            })
        );
    }
}
