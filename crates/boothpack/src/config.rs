//! Run configuration, read from flags with environment fallbacks.

use boothpack_common::{Error, HostPlatform, Result, PYTHON_ENV_VAR};
use boothpack_plan_schema::{Backend, OutputMode};
use boothpack_planner::PlanOptions;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args};
use std::path::PathBuf;
use std::time::Duration;

/// Parallelism hint used when the CPU count cannot be determined.
pub const FALLBACK_JOBS: usize = 4;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct EnvironmentArgs {
    /// Produce a single self-extracting executable instead of a directory tree
    #[arg(
        long,
        global = true,
        env = "PHOTOBOOTH_ONEFILE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub onefile: bool,

    /// Interpreter of the environment to bundle (path or program name)
    #[arg(long, global = true, env = PYTHON_ENV_VAR)]
    pub python: Option<PathBuf>,

    /// Bundling backend (nuitka, pyinstaller)
    #[arg(long, global = true, env = "PHOTOBOOTH_BACKEND", default_value = "nuitka")]
    pub backend: String,

    /// Output directory for the bundle
    #[arg(long, global = true, env = "PHOTOBOOTH_DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Parallel compilation jobs [default: CPU count]
    #[arg(long, global = true, env = "PHOTOBOOTH_JOBS")]
    pub jobs: Option<usize>,

    /// OS identifier to plan for instead of the host's
    #[arg(long, global = true, env = "PHOTOBOOTH_PLATFORM")]
    pub platform: Option<String>,

    /// Source tree root [default: current directory]
    #[arg(long, global = true, env = "PHOTOBOOTH_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Seconds each environment probe may take
    #[arg(long, global = true, env = "PHOTOBOOTH_PROBE_TIMEOUT", default_value = "10")]
    pub probe_timeout: u64,
}

/// Validated configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub platform: HostPlatform,
    pub backend: Backend,
    pub output_mode: OutputMode,
    pub project_root: PathBuf,
    pub output_dir: PathBuf,
    pub python: Option<PathBuf>,
    pub jobs: usize,
    pub probe_timeout: Duration,
}

impl Settings {
    pub fn from_args(args: &EnvironmentArgs) -> Result<Self> {
        let backend: Backend = args.backend.parse()?;
        let platform = HostPlatform::detect(args.platform.as_deref());

        let project_root = match &args.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        if !project_root.is_dir() {
            return Err(Error::configuration(
                format!("project root {} is not a directory", project_root.display()),
                "PHOTOBOOTH_PROJECT_ROOT",
            ));
        }

        let jobs = match args.jobs {
            Some(0) => {
                return Err(Error::configuration(
                    "jobs must be at least 1",
                    "PHOTOBOOTH_JOBS",
                ))
            }
            Some(jobs) => jobs,
            None => default_jobs(),
        };

        if args.probe_timeout == 0 {
            return Err(Error::configuration(
                "probe timeout must be at least one second",
                "PHOTOBOOTH_PROBE_TIMEOUT",
            ));
        }

        Ok(Self {
            platform,
            backend,
            output_mode: OutputMode::from_onefile(args.onefile),
            project_root,
            output_dir: args.dist_dir.clone(),
            python: args.python.clone(),
            jobs,
            probe_timeout: Duration::from_secs(args.probe_timeout),
        })
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            backend: self.backend,
            platform: self.platform,
            output_mode: self.output_mode,
            project_root: self.project_root.clone(),
            output_dir: self.output_dir.clone(),
            jobs: self.jobs,
        }
    }
}

fn default_jobs() -> usize {
    match num_cpus::get() {
        0 => FALLBACK_JOBS,
        n => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn args(root: &TempDir) -> EnvironmentArgs {
        EnvironmentArgs {
            onefile: false,
            python: None,
            backend: "nuitka".to_string(),
            dist_dir: PathBuf::from("dist"),
            jobs: None,
            platform: Some("linux".to_string()),
            project_root: Some(root.path().to_path_buf()),
            probe_timeout: 10,
        }
    }

    #[test]
    fn test_defaults() {
        let root = TempDir::new().unwrap();
        let settings = Settings::from_args(&args(&root)).unwrap();

        assert_eq!(settings.backend, Backend::Nuitka);
        assert_eq!(settings.platform, HostPlatform::Linux);
        assert_eq!(settings.output_mode, OutputMode::Directory);
        assert_eq!(settings.probe_timeout, Duration::from_secs(10));
        assert!(settings.jobs >= 1);
    }

    #[test]
    fn test_overrides() {
        let root = TempDir::new().unwrap();
        let mut args = args(&root);
        args.onefile = true;
        args.backend = "PyInstaller".to_string();
        args.platform = Some("win32".to_string());
        args.jobs = Some(2);

        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.backend, Backend::PyInstaller);
        assert_eq!(settings.platform, HostPlatform::Windows);
        assert_eq!(settings.output_mode, OutputMode::SingleFile);
        assert_eq!(settings.plan_options().jobs, 2);
    }

    #[test]
    fn test_invalid_values_name_their_variable() {
        let root = TempDir::new().unwrap();

        let mut bad_backend = args(&root);
        bad_backend.backend = "cx_freeze".to_string();
        let err = Settings::from_args(&bad_backend).unwrap_err();
        assert!(err.to_string().contains("PHOTOBOOTH_BACKEND"));

        let mut zero_jobs = args(&root);
        zero_jobs.jobs = Some(0);
        let err = Settings::from_args(&zero_jobs).unwrap_err();
        assert!(err.to_string().contains("PHOTOBOOTH_JOBS"));

        let mut missing_root = args(&root);
        missing_root.project_root = Some(root.path().join("nope"));
        let err = Settings::from_args(&missing_root).unwrap_err();
        assert!(err.to_string().contains("PHOTOBOOTH_PROJECT_ROOT"));
    }
}
