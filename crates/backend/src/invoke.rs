//! Backend invocation.

use crate::vocabulary::{vocabulary_for, FlagVocabulary};
use boothpack_common::{Error, Result};
use boothpack_plan_schema::InclusionPlan;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Arguments passed to the interpreter: `-m <module>` followed by the translated plan.
pub fn command_line(plan: &InclusionPlan, vocabulary: &dyn FlagVocabulary) -> Result<Vec<String>> {
    let mut args = vec!["-m".to_string(), vocabulary.python_module().to_string()];
    args.extend(vocabulary.translate(plan)?);
    Ok(args)
}

/// Run the plan's backend with `interpreter` and wait for it.
///
/// The backend inherits stdio and runs from the project root. On success the
/// artifact location is returned. A non-zero exit becomes
/// [`Error::BackendExecution`] carrying the backend's own exit code.
pub async fn invoke(plan: &InclusionPlan, interpreter: &Path) -> Result<PathBuf> {
    let vocabulary = vocabulary_for(plan.backend, plan.platform);
    let args = command_line(plan, vocabulary.as_ref())?;

    info!(
        "Running {} with {} inclusion entries",
        plan.backend,
        plan.entries.len()
    );
    debug!("{} {}", interpreter.display(), args.join(" "));

    let status = Command::new(interpreter)
        .args(&args)
        .current_dir(&plan.project_root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await?;

    if !status.success() {
        return Err(Error::BackendExecution {
            backend: plan.backend.to_string(),
            code: status.code(),
        });
    }

    Ok(vocabulary.artifact_path(plan))
}
