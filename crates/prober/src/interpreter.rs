//! Interpreter location and validation.

use boothpack_common::{Error, HostPlatform, Result, PYTHON_ENV_VAR};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// A validated, executable interpreter path.
///
/// Only [`locate_interpreter`] creates one, so holding a handle means the
/// interpreter existed and was executable when the run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterHandle {
    path: PathBuf,
}

impl InterpreterHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the interpreter used for probing and for running the backend.
///
/// Resolution order:
/// 1. `override_path` when given. A bare program name is looked up on `PATH`,
///    a relative path is resolved against `project_root`.
/// 2. The platform's virtual-environment subpath under `project_root`.
pub fn locate_interpreter(
    override_path: Option<&Path>,
    project_root: &Path,
    platform: HostPlatform,
) -> Result<InterpreterHandle> {
    let candidate = match override_path {
        Some(path) if is_bare_program_name(path) => which::which(path).map_err(|e| {
            Error::configuration(
                format!("interpreter '{}' not found on PATH: {}", path.display(), e),
                PYTHON_ENV_VAR,
            )
        })?,
        Some(path) if path.is_relative() => project_root.join(path),
        Some(path) => path.to_path_buf(),
        None => default_interpreter_path(project_root, platform),
    };

    debug!("Interpreter candidate: {}", candidate.display());
    validate_executable(&candidate)?;

    info!("Using interpreter {}", candidate.display());
    Ok(InterpreterHandle { path: candidate })
}

/// Default interpreter location for `platform` under `project_root`.
pub fn default_interpreter_path(project_root: &Path, platform: HostPlatform) -> PathBuf {
    platform
        .defaults()
        .interpreter_subpath
        .iter()
        .fold(project_root.to_path_buf(), |path, part| path.join(part))
}

fn is_bare_program_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn validate_executable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|_| {
        Error::configuration(
            format!("interpreter not found at {}", path.display()),
            PYTHON_ENV_VAR,
        )
    })?;

    if !metadata.is_file() {
        return Err(Error::configuration(
            format!("interpreter path {} is not a file", path.display()),
            PYTHON_ENV_VAR,
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::configuration(
                format!("interpreter at {} is not executable", path.display()),
                PYTHON_ENV_VAR,
            ));
        }
    }

    Ok(())
}
