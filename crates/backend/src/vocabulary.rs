//! Flag vocabularies of the bundling backends.
//!
//! Both backends consume the same ordered plan. Each entry becomes exactly one
//! command-line flag, and anything a backend cannot express is rejected here,
//! before the backend is ever started.

use boothpack_common::{is_module_name, Error, HostPlatform, Result};
use boothpack_plan_schema::{Backend, InclusionEntry, InclusionPlan};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Per-backend mapping from plan to command-line arguments.
pub trait FlagVocabulary: Send + Sync {
    /// Backend this vocabulary speaks.
    fn backend(&self) -> Backend;

    /// Module run as `python -m <module>`.
    fn python_module(&self) -> &'static str;

    /// Flags derived from the plan's toggles rather than its entries.
    fn toggle_flags(&self, plan: &InclusionPlan) -> Result<Vec<String>>;

    /// The single flag expressing `entry`.
    fn entry_flag(&self, plan: &InclusionPlan, entry: &InclusionEntry) -> Result<String>;

    /// Where the backend leaves the finished artifact.
    fn artifact_path(&self, plan: &InclusionPlan) -> PathBuf;

    /// Full argument list after `-m <module>`: toggles, entries in plan order, entry script.
    fn translate(&self, plan: &InclusionPlan) -> Result<Vec<String>> {
        if plan.backend != self.backend() {
            return Err(translation_error(
                self.backend(),
                "plan",
                format!("plan was built for {}", plan.backend),
            ));
        }

        let mut args = self.toggle_flags(plan)?;
        for entry in &plan.entries {
            args.push(self.entry_flag(plan, entry)?);
        }
        args.push(path_arg(
            self.backend(),
            "entry script",
            &resolve(plan, &plan.entry_script),
            None,
        )?);
        Ok(args)
    }
}

/// Vocabulary for `backend` on `platform`.
pub fn vocabulary_for(backend: Backend, platform: HostPlatform) -> Box<dyn FlagVocabulary> {
    match backend {
        Backend::Nuitka => Box::new(NuitkaVocabulary),
        Backend::PyInstaller => Box::new(PyInstallerVocabulary::new(platform)),
    }
}

/// Interpreter-embedding backend.
#[derive(Debug, Clone, Copy)]
pub struct PyInstallerVocabulary {
    separator: char,
}

impl PyInstallerVocabulary {
    pub fn new(platform: HostPlatform) -> Self {
        Self {
            separator: platform.defaults().data_separator,
        }
    }

    fn work_dir(plan: &InclusionPlan) -> PathBuf {
        plan.project_root.join("build").join("pyinstaller")
    }

    fn pair(
        &self,
        flag: &str,
        plan: &InclusionPlan,
        entry: &InclusionEntry,
        src: &Path,
        dst: &str,
    ) -> Result<String> {
        let backend = self.backend();
        let src = path_arg(backend, entry, &resolve(plan, src), Some(self.separator))?;
        let dst = destination_arg(backend, entry, dst, self.separator)?;
        Ok(format!("{}={}{}{}", flag, src, self.separator, dst))
    }

    /// File entries name a target directory here; the file keeps its source name.
    fn file_pair(
        &self,
        flag: &str,
        plan: &InclusionPlan,
        entry: &InclusionEntry,
        src: &Path,
        dst: &str,
    ) -> Result<String> {
        let backend = self.backend();
        let dst = destination_arg(backend, entry, dst, self.separator)?;
        let (dir, name) = match dst.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => (".", dst),
        };

        if src.file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(translation_error(
                backend,
                entry,
                format!("{} cannot rename {} to {}", backend, src.display(), name),
            ));
        }

        let src = path_arg(backend, entry, &resolve(plan, src), Some(self.separator))?;
        Ok(format!("{}={}{}{}", flag, src, self.separator, dir))
    }
}

impl FlagVocabulary for PyInstallerVocabulary {
    fn backend(&self) -> Backend {
        Backend::PyInstaller
    }

    fn python_module(&self) -> &'static str {
        "PyInstaller"
    }

    fn toggle_flags(&self, plan: &InclusionPlan) -> Result<Vec<String>> {
        let backend = self.backend();
        let mode = if plan.output_mode.is_single_file() {
            "--onefile"
        } else {
            "--onedir"
        };
        let dist = path_arg(backend, "output directory", &resolve(plan, &plan.output_dir), None)?;
        let work = path_arg(backend, "work directory", &Self::work_dir(plan), None)?;

        Ok(vec![
            "--noconfirm".to_string(),
            "--clean".to_string(),
            mode.to_string(),
            format!("--name={}", plan.product_name),
            format!("--distpath={}", dist),
            format!("--workpath={}", work),
            format!("--specpath={}", work),
        ])
    }

    fn entry_flag(&self, plan: &InclusionPlan, entry: &InclusionEntry) -> Result<String> {
        match entry {
            InclusionEntry::DataDir { src, dst } => self.pair("--add-data", plan, entry, src, dst),
            InclusionEntry::DataFile { src, dst } => {
                self.file_pair("--add-data", plan, entry, src, dst)
            }
            InclusionEntry::Binary { src, dst } => {
                self.file_pair("--add-binary", plan, entry, src, dst)
            }
            InclusionEntry::ImportModule { name } => Ok(format!(
                "--hidden-import={}",
                module_arg(self.backend(), entry, name)?
            )),
            InclusionEntry::ImportPackage { name } => Ok(format!(
                "--collect-submodules={}",
                module_arg(self.backend(), entry, name)?
            )),
        }
    }

    fn artifact_path(&self, plan: &InclusionPlan) -> PathBuf {
        let dist = resolve(plan, &plan.output_dir);
        if plan.output_mode.is_single_file() {
            dist.join(plan.executable_name())
        } else {
            dist.join(&plan.product_name)
        }
    }
}

/// Native ahead-of-time compiling backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NuitkaVocabulary;

impl NuitkaVocabulary {
    const SEPARATOR: char = '=';

    fn pair(
        &self,
        flag: &str,
        plan: &InclusionPlan,
        entry: &InclusionEntry,
        src: &Path,
        dst: &str,
    ) -> Result<String> {
        let backend = self.backend();
        let src = path_arg(backend, entry, &resolve(plan, src), Some(Self::SEPARATOR))?;
        let dst = destination_arg(backend, entry, dst, Self::SEPARATOR)?;
        Ok(format!("{}={}={}", flag, src, dst))
    }
}

impl FlagVocabulary for NuitkaVocabulary {
    fn backend(&self) -> Backend {
        Backend::Nuitka
    }

    fn python_module(&self) -> &'static str {
        "nuitka"
    }

    fn toggle_flags(&self, plan: &InclusionPlan) -> Result<Vec<String>> {
        let output = path_arg(
            self.backend(),
            "output directory",
            &resolve(plan, &plan.output_dir),
            None,
        )?;

        let mut flags = vec!["--standalone".to_string()];
        if plan.output_mode.is_single_file() {
            flags.push("--onefile".to_string());
        }
        flags.push("--assume-yes-for-downloads".to_string());
        flags.push(format!("--jobs={}", plan.jobs.max(1)));
        flags.push(format!("--output-dir={}", output));
        flags.push(format!("--output-filename={}", plan.executable_name()));
        if let Some(toolchain) = plan.toolchain {
            flags.push(format!("--{}", toolchain));
        }
        Ok(flags)
    }

    fn entry_flag(&self, plan: &InclusionPlan, entry: &InclusionEntry) -> Result<String> {
        match entry {
            InclusionEntry::DataFile { src, dst } | InclusionEntry::Binary { src, dst } => {
                self.pair("--include-data-files", plan, entry, src, dst)
            }
            InclusionEntry::DataDir { src, dst } => {
                self.pair("--include-data-dir", plan, entry, src, dst)
            }
            InclusionEntry::ImportModule { name } => Ok(format!(
                "--include-module={}",
                module_arg(self.backend(), entry, name)?
            )),
            InclusionEntry::ImportPackage { name } => Ok(format!(
                "--include-package={}",
                module_arg(self.backend(), entry, name)?
            )),
        }
    }

    fn artifact_path(&self, plan: &InclusionPlan) -> PathBuf {
        let output = resolve(plan, &plan.output_dir);
        if plan.output_mode.is_single_file() {
            return output.join(plan.executable_name());
        }
        let stem = plan
            .entry_script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| plan.product_name.clone());
        output.join(format!("{}.dist", stem))
    }
}

fn translation_error(backend: Backend, entry: impl Display, reason: impl Into<String>) -> Error {
    Error::PlanTranslation {
        backend: backend.to_string(),
        entry: entry.to_string(),
        reason: reason.into(),
    }
}

/// Project-relative paths are made absolute so the backend's own base directory never matters.
fn resolve(plan: &InclusionPlan, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        plan.project_root.join(path)
    }
}

fn path_arg(
    backend: Backend,
    what: impl Display,
    path: &Path,
    separator: Option<char>,
) -> Result<String> {
    let text = path.to_str().ok_or_else(|| {
        translation_error(
            backend,
            &what,
            format!("path {} is not valid UTF-8", path.display()),
        )
    })?;

    if let Some(sep) = separator {
        if text.contains(sep) {
            return Err(translation_error(
                backend,
                &what,
                format!("path {} contains the separator '{}'", text, sep),
            ));
        }
    }
    Ok(text.to_string())
}

fn destination_arg<'a>(
    backend: Backend,
    entry: &InclusionEntry,
    dst: &'a str,
    separator: char,
) -> Result<&'a str> {
    let reason = if dst.is_empty() {
        Some("empty destination".to_string())
    } else if dst.starts_with('/') || dst.starts_with('\\') || dst.as_bytes().get(1) == Some(&b':') {
        Some(format!("destination {} is not bundle-relative", dst))
    } else if dst.split(|c| c == '/' || c == '\\').any(|part| part == "..") {
        Some(format!("destination {} escapes the bundle root", dst))
    } else if dst.contains(separator) {
        Some(format!("destination {} contains the separator '{}'", dst, separator))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(translation_error(backend, entry, reason)),
        None => Ok(dst),
    }
}

fn module_arg<'a>(backend: Backend, entry: &InclusionEntry, name: &'a str) -> Result<&'a str> {
    if is_module_name(name) {
        Ok(name)
    } else {
        Err(translation_error(
            backend,
            entry,
            format!("'{}' is not a valid module name", name),
        ))
    }
}
