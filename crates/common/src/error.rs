//! Common error types for boothpack.

use thiserror::Error;

/// Common error type for boothpack operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The interpreter (or another precondition) is unusable. Fatal before probing.
    #[error("Configuration error: {message} (set {variable} to override)")]
    Configuration { message: String, variable: String },

    /// An optional component could not be located. Recovered by the prober.
    #[error("Probe failed for {component}: {reason}")]
    ProbeFailure { component: String, reason: String },

    /// A plan entry the selected backend cannot express.
    #[error("Cannot translate {entry} for {backend}: {reason}")]
    PlanTranslation {
        backend: String,
        entry: String,
        reason: String,
    },

    /// The bundling backend exited unsuccessfully. `code` is `None` when killed by a signal.
    #[error("{backend} failed with {}", describe_exit(.code))]
    BackendExecution { backend: String, code: Option<i32> },

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("{0}")]
    Other(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}

impl Error {
    /// Build a configuration error that points the operator at an override variable.
    pub fn configuration(message: impl Into<String>, variable: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            variable: variable.into(),
        }
    }

    /// Process exit code this error should terminate the run with.
    ///
    /// Backend failures pass the backend's own code through unchanged; every
    /// other fatal condition exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BackendExecution {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_variable() {
        let err = Error::configuration("interpreter not found at .venv/bin/python", "PHOTOBOOTH_PYTHON");
        let msg = err.to_string();
        assert!(msg.contains("PHOTOBOOTH_PYTHON"));
        assert!(msg.contains(".venv/bin/python"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_backend_exit_code_passthrough() {
        let err = Error::BackendExecution {
            backend: "nuitka".to_string(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);

        let killed = Error::BackendExecution {
            backend: "nuitka".to_string(),
            code: None,
        };
        assert_eq!(killed.exit_code(), 1);
        assert!(killed.to_string().contains("signal"));
    }
}
