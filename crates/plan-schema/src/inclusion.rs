//! Inclusion entries - one unit of "this must be in the bundle".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single inclusion directive.
///
/// Destinations are bundle-relative and always use `/` as separator, so the
/// same plan reads identically on every host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InclusionEntry {
    /// A single data file copied verbatim.
    DataFile { src: PathBuf, dst: String },
    /// A directory tree copied verbatim.
    DataDir { src: PathBuf, dst: String },
    /// An executable shipped alongside the application.
    Binary { src: PathBuf, dst: String },
    /// A module the backend's import analysis would not find on its own.
    ImportModule { name: String },
    /// A whole package, including every submodule.
    ImportPackage { name: String },
}

impl InclusionEntry {
    pub fn data_file(src: impl Into<PathBuf>, dst: impl Into<String>) -> Self {
        InclusionEntry::DataFile {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn data_dir(src: impl Into<PathBuf>, dst: impl Into<String>) -> Self {
        InclusionEntry::DataDir {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn binary(src: impl Into<PathBuf>, dst: impl Into<String>) -> Self {
        InclusionEntry::Binary {
            src: src.into(),
            dst: dst.into(),
        }
    }

    pub fn import_module(name: impl Into<String>) -> Self {
        InclusionEntry::ImportModule { name: name.into() }
    }

    pub fn import_package(name: impl Into<String>) -> Self {
        InclusionEntry::ImportPackage { name: name.into() }
    }

    /// Serialized tag of this entry.
    pub fn kind(&self) -> &'static str {
        match self {
            InclusionEntry::DataFile { .. } => "data_file",
            InclusionEntry::DataDir { .. } => "data_dir",
            InclusionEntry::Binary { .. } => "binary",
            InclusionEntry::ImportModule { .. } => "import_module",
            InclusionEntry::ImportPackage { .. } => "import_package",
        }
    }

    /// Source path for file-like entries.
    pub fn source(&self) -> Option<&Path> {
        match self {
            InclusionEntry::DataFile { src, .. }
            | InclusionEntry::DataDir { src, .. }
            | InclusionEntry::Binary { src, .. } => Some(src),
            InclusionEntry::ImportModule { .. } | InclusionEntry::ImportPackage { .. } => None,
        }
    }

    /// Bundle-relative destination for file-like entries.
    pub fn destination(&self) -> Option<&str> {
        match self {
            InclusionEntry::DataFile { dst, .. }
            | InclusionEntry::DataDir { dst, .. }
            | InclusionEntry::Binary { dst, .. } => Some(dst),
            InclusionEntry::ImportModule { .. } | InclusionEntry::ImportPackage { .. } => None,
        }
    }

    /// Qualified module or package name for import entries.
    pub fn module_name(&self) -> Option<&str> {
        match self {
            InclusionEntry::ImportModule { name } | InclusionEntry::ImportPackage { name } => {
                Some(name)
            }
            _ => None,
        }
    }
}

impl fmt::Display for InclusionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InclusionEntry::DataFile { src, dst }
            | InclusionEntry::DataDir { src, dst }
            | InclusionEntry::Binary { src, dst } => {
                write!(f, "{} {} -> {}", self.kind(), src.display(), dst)
            }
            InclusionEntry::ImportModule { name } | InclusionEntry::ImportPackage { name } => {
                write!(f, "{} {}", self.kind(), name)
            }
        }
    }
}
