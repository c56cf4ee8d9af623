//! Compiler error types

use thiserror::Error;

use crate::domain::stage::StageKind;

/// Result type alias for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors returned by the workflow compiler
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    /// The request is malformed or contradictory
    #[error("invalid workflow request: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The compiled graph broke one of its own invariants
    ///
    /// Unreachable for a correct compiler.
    #[error("workflow graph invariant violated: {0}")]
    Invariant(String),
}

/// A request the compiler refuses to turn into a graph
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("duration_seconds must be positive, got {0}")]
    NonPositiveDuration(i64),

    #[error("load test workers must be >= 0, got {0}")]
    NegativeWorkers(i64),

    #[error("load test workers must be <= {max}, got {got}")]
    TooManyWorkers { got: i64, max: i64 },

    #[error("load test users must be >= 0, got {0}")]
    NegativeUsers(i64),

    #[error("load test port must be within 1..=65535, got {0}")]
    InvalidPort(i64),

    #[error("env var `{name}` of stage {stage} is reserved")]
    ReservedEnvVar { stage: StageKind, name: String },

    #[error("env var `{name}` of stage {stage} is not a valid variable name")]
    InvalidEnvVarName { stage: StageKind, name: String },
}

/// Deployment settings that cannot produce a working workflow
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("setting `{0}` cannot be empty")]
    EmptySetting(&'static str),

    #[error("callback_url must start with http:// or https://, got `{0}`")]
    InvalidCallbackUrl(String),
}

impl CompileError {
    /// Whether the caller sent a bad request, as opposed to a compiler defect
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CompileError::from(ConfigurationError::NegativeWorkers(-1));
        assert_eq!(
            err.to_string(),
            "invalid workflow request: load test workers must be >= 0, got -1"
        );
        assert!(err.is_client_error());

        let err = ConfigurationError::ReservedEnvVar {
            stage: StageKind::Monitoring,
            name: "BOLT_AUTH_TOKEN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "env var `BOLT_AUTH_TOKEN` of stage monitoring is reserved"
        );
    }

    #[test]
    fn test_invariant_is_not_client_error() {
        assert!(!CompileError::Invariant("cycle".to_string()).is_client_error());
    }
}
