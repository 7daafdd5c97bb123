//! Optional-component probing inside the target environment.

use crate::components::{ComponentSpec, ProbeShape, EXISTS_SCRIPT, LOCATE_SCRIPT, ROOT_ROLE};
use crate::executor::Executor;
use crate::interpreter::InterpreterHandle;
use crate::search;
use async_trait::async_trait;
use boothpack_common::{is_module_name, Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A discovered filesystem location of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbedLocation {
    /// What the path is: [`ROOT_ROLE`] or the pattern it matched.
    pub role: String,
    /// Absolute path in the target environment.
    pub path: PathBuf,
    /// Path relative to the component's install root.
    pub relative: PathBuf,
}

/// Result of probing one optional component. Empty means "not installed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentProbeResult {
    pub component: String,
    pub locations: Vec<ProbedLocation>,
}

impl ComponentProbeResult {
    pub fn empty(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            locations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Location found for `role`, if any.
    pub fn location(&self, role: &str) -> Option<&ProbedLocation> {
        self.locations.iter().find(|l| l.role == role)
    }

    /// Install root returned by a single-path probe.
    pub fn root(&self) -> Option<&Path> {
        self.location(ROOT_ROLE).map(|l| l.path.as_path())
    }
}

/// Capability to inspect the environment that is going to be bundled.
#[async_trait]
pub trait EnvironmentProbe: Send + Sync {
    /// Locate an optional component. Absence and probe errors both yield an empty result.
    async fn locate(&self, component: &ComponentSpec) -> ComponentProbeResult;

    /// Whether an importable module exists. Never fails.
    async fn module_exists(&self, module: &str) -> bool;
}

/// Probe that asks the bundled interpreter itself, one subprocess per question.
pub struct InterpreterProbe {
    interpreter: InterpreterHandle,
    executor: Box<dyn Executor>,
}

impl InterpreterProbe {
    pub fn new(interpreter: InterpreterHandle, executor: Box<dyn Executor>) -> Self {
        Self {
            interpreter,
            executor,
        }
    }

    async fn run_script(&self, component: &str, script: &str, arg: &str) -> Result<String> {
        if !is_module_name(arg) {
            return Err(Error::ProbeFailure {
                component: component.to_string(),
                reason: format!("refusing to probe unsafe module name '{}'", arg),
            });
        }

        let (code, stdout, stderr) = self
            .executor
            .execute(self.interpreter.path(), &["-c", script, arg])
            .await
            .map_err(|e| Error::ProbeFailure {
                component: component.to_string(),
                reason: e.to_string(),
            })?;

        if code != Some(0) {
            return Err(Error::ProbeFailure {
                component: component.to_string(),
                reason: format!("interpreter exited with {:?}: {}", code, stderr.trim()),
            });
        }

        Ok(stdout.trim().to_string())
    }

    async fn find_root(&self, component: &ComponentSpec) -> Result<PathBuf> {
        let reported = self
            .run_script(component.name, LOCATE_SCRIPT, component.import_name)
            .await?;

        let not_found = |reason: String| Error::ProbeFailure {
            component: component.name.to_string(),
            reason,
        };

        let line = reported
            .lines()
            .last()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| not_found(format!("{} is not installed", component.import_name)))?;

        let root = PathBuf::from(line.trim());
        if !root.is_dir() {
            return Err(not_found(format!(
                "reported location {} does not exist",
                root.display()
            )));
        }
        Ok(root)
    }

    async fn try_locate(&self, component: &ComponentSpec) -> Result<ComponentProbeResult> {
        let root = self.find_root(component).await?;

        let locations = match component.shape {
            ProbeShape::Single => vec![ProbedLocation {
                role: ROOT_ROLE.to_string(),
                path: root,
                relative: PathBuf::new(),
            }],
            ProbeShape::Multi(patterns) => search::first_match_per_pattern(&root, patterns),
        };

        Ok(ComponentProbeResult {
            component: component.name.to_string(),
            locations,
        })
    }
}

#[async_trait]
impl EnvironmentProbe for InterpreterProbe {
    async fn locate(&self, component: &ComponentSpec) -> ComponentProbeResult {
        match self.try_locate(component).await {
            Ok(result) => {
                debug!(
                    "Probed {}: {} location(s)",
                    component.name,
                    result.locations.len()
                );
                result
            }
            Err(e) => {
                debug!("{}", e);
                ComponentProbeResult::empty(component.name)
            }
        }
    }

    async fn module_exists(&self, module: &str) -> bool {
        match self.run_script(module, EXISTS_SCRIPT, module).await {
            Ok(out) => out.lines().last() == Some("1"),
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }
}
