//! Inclusion plan types - output of the planner, input of a backend.

use crate::inclusion::InclusionEntry;
use boothpack_common::{hash, HostPlatform, Toolchain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Bundling backend that turns a plan into a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Ahead-of-time compiling backend.
    Nuitka,
    /// Interpreter-embedding backend.
    PyInstaller,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Nuitka => write!(f, "nuitka"),
            Backend::PyInstaller => write!(f, "pyinstaller"),
        }
    }
}

impl FromStr for Backend {
    type Err = boothpack_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nuitka" => Ok(Backend::Nuitka),
            "pyinstaller" => Ok(Backend::PyInstaller),
            _ => Err(boothpack_common::Error::configuration(
                format!("unknown backend '{}', expected nuitka or pyinstaller", s),
                "PHOTOBOOTH_BACKEND",
            )),
        }
    }
}

/// Shape of the produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One self-extracting executable.
    SingleFile,
    /// One directory tree with an executable and its data.
    Directory,
}

impl OutputMode {
    pub fn from_onefile(onefile: bool) -> Self {
        if onefile {
            OutputMode::SingleFile
        } else {
            OutputMode::Directory
        }
    }

    pub fn is_single_file(&self) -> bool {
        matches!(self, OutputMode::SingleFile)
    }
}

/// Non-fatal condition raised while planning, e.g. a missing optional component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// Component the warning is about.
    pub component: String,
    /// What will not work in the produced bundle.
    pub message: String,
}

impl PlanWarning {
    pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.component, self.message)
    }
}

/// The complete inclusion plan - everything a backend needs to produce a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionPlan {
    /// Schema version.
    pub schema_version: String,
    /// Backend the plan is meant for.
    pub backend: Backend,
    /// Host the plan was derived on.
    pub platform: HostPlatform,
    /// Single file or directory tree.
    pub output_mode: OutputMode,
    /// Compiler toolchain override for the native-compiling backend.
    pub toolchain: Option<Toolchain>,
    /// Name of the produced executable (without suffix).
    pub product_name: String,
    /// Entry script, relative to the project root.
    pub entry_script: PathBuf,
    /// Source tree the relative sources are resolved against.
    pub project_root: PathBuf,
    /// Where the backend writes the bundle.
    pub output_dir: PathBuf,
    /// Parallelism hint passed to the backend.
    pub jobs: usize,
    /// Ordered inclusion entries.
    pub entries: Vec<InclusionEntry>,
    /// Warnings raised while planning.
    pub warnings: Vec<PlanWarning>,
}

impl InclusionPlan {
    /// Stable digest over the ordered entries and the toggles that shape the bundle.
    ///
    /// Two plans built from the same probe results hash identically.
    pub fn fingerprint(&self) -> String {
        let header = [
            format!("backend {}", self.backend),
            format!("platform {}", self.platform),
            format!("mode {:?}", self.output_mode),
            format!(
                "toolchain {}",
                self.toolchain
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "default".to_string())
            ),
        ];
        let entries = self.entries.iter().map(|e| e.to_string());
        hash::sha256_lines(header.into_iter().chain(entries))
    }

    /// True when at least one optional component is missing from the bundle.
    pub fn is_reduced_capability(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Qualified names of all ImportModule entries, in plan order.
    pub fn import_modules(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            InclusionEntry::ImportModule { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// File name of the produced executable.
    pub fn executable_name(&self) -> String {
        self.platform.executable_name(&self.product_name)
    }
}

/// Serialized form of a plan, as written to `plan.json`.
#[derive(Debug, Serialize)]
pub struct PlanDocument<'a> {
    pub fingerprint: String,
    #[serde(flatten)]
    pub plan: &'a InclusionPlan,
}

impl<'a> PlanDocument<'a> {
    pub fn new(plan: &'a InclusionPlan) -> Self {
        Self {
            fingerprint: plan.fingerprint(),
            plan,
        }
    }
}
