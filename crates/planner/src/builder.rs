//! Inclusion plan builder.

use crate::layout;
use crate::plugins;
use crate::report::ProbeReport;
use boothpack_common::HostPlatform;
use boothpack_plan_schema::{
    Backend, InclusionEntry, InclusionPlan, OutputMode, PlanWarning, PLAN_SCHEMA_VERSION,
};
use boothpack_prober::components::{CAMERA_DRIVER_PATTERN, CAMERA_TRANSPORT_PATTERN};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bundle subdirectory the cloud-sync executable is placed in.
pub const CLOUD_SYNC_DESTINATION: &str = "rclone_bin";

/// Executable stem of the cloud-sync tool.
pub const CLOUD_SYNC_EXECUTABLE: &str = "rclone";

/// Bundle subdirectory the camera plugin trees are placed under.
pub const CAMERA_DESTINATION: &str = "gphoto2";

/// Everything about a plan that does not come from probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub backend: Backend,
    pub platform: HostPlatform,
    pub output_mode: OutputMode,
    pub project_root: PathBuf,
    pub output_dir: PathBuf,
    pub jobs: usize,
}

/// Builds the ordered inclusion plan from a probe report.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    options: PlanOptions,
}

impl PlanBuilder {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    /// Build the complete plan.
    ///
    /// Entries come in a fixed order: static assets, cloud-sync binary,
    /// camera trees, acceleration modules, plugins. Missing optional
    /// components are reported as plan warnings, never as errors.
    pub fn build(&self, report: &ProbeReport) -> InclusionPlan {
        let mut entries = layout::static_entries();
        let mut warnings = Vec::new();

        self.plan_cloud_sync(report, &mut entries, &mut warnings);
        self.plan_camera(report, &mut entries, &mut warnings);

        for module in report.present_acceleration() {
            debug!("Including acceleration module {}", module);
            entries.push(InclusionEntry::import_module(module));
        }

        debug!("Plugin table version {}", plugins::PLUGIN_TABLE_VERSION);
        entries.extend(plugins::plugin_entries());

        for warning in &warnings {
            warn!("{}", warning);
        }

        let toolchain = match self.options.backend {
            Backend::Nuitka => self.options.platform.defaults().toolchain,
            Backend::PyInstaller => None,
        };

        InclusionPlan {
            schema_version: PLAN_SCHEMA_VERSION.to_string(),
            backend: self.options.backend,
            platform: self.options.platform,
            output_mode: self.options.output_mode,
            toolchain,
            product_name: layout::PRODUCT_NAME.to_string(),
            entry_script: layout::entry_script(),
            project_root: self.options.project_root.clone(),
            output_dir: self.options.output_dir.clone(),
            jobs: self.options.jobs,
            entries,
            warnings,
        }
    }

    fn plan_cloud_sync(
        &self,
        report: &ProbeReport,
        entries: &mut Vec<InclusionEntry>,
        warnings: &mut Vec<PlanWarning>,
    ) {
        let component = &report.cloud_sync.component;
        let executable = self.options.platform.executable_name(CLOUD_SYNC_EXECUTABLE);

        let Some(dir) = report.cloud_sync.root() else {
            warnings.push(PlanWarning::new(
                component.as_str(),
                format!(
                    "not installed; {} will be missing from the bundle and sync-dependent functionality will fail at runtime",
                    executable
                ),
            ));
            return;
        };

        let candidate = dir.join(&executable);
        if candidate.is_file() {
            entries.push(InclusionEntry::binary(
                candidate,
                format!("{}/{}", CLOUD_SYNC_DESTINATION, executable),
            ));
        } else {
            warnings.push(PlanWarning::new(
                component.as_str(),
                format!(
                    "no {} in {}; sync-dependent functionality will fail at runtime",
                    executable,
                    dir.display()
                ),
            ));
        }
    }

    fn plan_camera(
        &self,
        report: &ProbeReport,
        entries: &mut Vec<InclusionEntry>,
        warnings: &mut Vec<PlanWarning>,
    ) {
        match report.camera.location(CAMERA_TRANSPORT_PATTERN) {
            Some(transport) => entries.push(InclusionEntry::data_dir(
                transport.path.clone(),
                bundle_path(CAMERA_DESTINATION, &transport.relative),
            )),
            None => warnings.push(PlanWarning::new(
                report.camera.component.as_str(),
                format!(
                    "{} tree not found; camera support will not work in the bundle",
                    CAMERA_TRANSPORT_PATTERN
                ),
            )),
        }

        // Optional within optional: the transport tree alone is enough to run.
        if let Some(driver) = report.camera.location(CAMERA_DRIVER_PATTERN) {
            entries.push(InclusionEntry::data_dir(
                driver.path.clone(),
                bundle_path(CAMERA_DESTINATION, &driver.relative),
            ));
        }
    }
}

/// Bundle-relative destination `prefix/relative` with `/` separators.
fn bundle_path(prefix: &str, relative: &Path) -> String {
    std::iter::once(prefix.to_string())
        .chain(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::CannedProbe;
    use crate::report::ModulePresence;
    use assert_fs::prelude::*;
    use boothpack_common::Toolchain;
    use boothpack_prober::components::{ACCELERATION_MODULES, ROOT_ROLE};
    use boothpack_prober::{ComponentProbeResult, ProbedLocation};
    use pretty_assertions::assert_eq;

    fn options(platform: HostPlatform, onefile: bool) -> PlanOptions {
        PlanOptions {
            backend: Backend::Nuitka,
            platform,
            output_mode: OutputMode::from_onefile(onefile),
            project_root: PathBuf::from("/srv/photobooth"),
            output_dir: PathBuf::from("dist"),
            jobs: 4,
        }
    }

    fn location(role: &str, root: &Path, relative: &str) -> ProbedLocation {
        ProbedLocation {
            role: role.to_string(),
            path: root.join(relative),
            relative: PathBuf::from(relative),
        }
    }

    fn empty_report() -> ProbeReport {
        ProbeReport {
            cloud_sync: ComponentProbeResult::empty("rclone"),
            camera: ComponentProbeResult::empty("gphoto2"),
            acceleration: ACCELERATION_MODULES
                .iter()
                .map(|m| ModulePresence {
                    module: m.to_string(),
                    present: false,
                })
                .collect(),
        }
    }

    fn cloud_sync_at(dir: &Path) -> ComponentProbeResult {
        ComponentProbeResult {
            component: "rclone".to_string(),
            locations: vec![ProbedLocation {
                role: ROOT_ROLE.to_string(),
                path: dir.to_path_buf(),
                relative: PathBuf::new(),
            }],
        }
    }

    #[test]
    fn test_non_windows_scenario() {
        // rclone missing, transport present, driver missing, directory mode.
        let gphoto = Path::new("/venv/site-packages/gphoto2");
        let mut report = empty_report();
        report.camera.locations = vec![location(
            CAMERA_TRANSPORT_PATTERN,
            gphoto,
            "libgphoto2_port",
        )];

        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);

        assert_eq!(plan.output_mode, OutputMode::Directory);
        assert_eq!(plan.toolchain, None);

        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].component, "rclone");
        assert!(plan.warnings[0].message.contains("fail at runtime"));

        let camera_dirs: Vec<&InclusionEntry> = plan
            .entries
            .iter()
            .filter(|e| e.destination().is_some_and(|d| d.starts_with("gphoto2/")))
            .collect();
        assert_eq!(
            camera_dirs,
            vec![&InclusionEntry::data_dir(
                gphoto.join("libgphoto2_port"),
                "gphoto2/libgphoto2_port"
            )]
        );

        assert!(!plan
            .entries
            .iter()
            .any(|e| matches!(e, InclusionEntry::Binary { .. })));
    }

    #[test]
    fn test_windows_scenario() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("rclone.exe").write_str("MZ").unwrap();

        let mut report = empty_report();
        report.cloud_sync = cloud_sync_at(dir.path());

        let plan = PlanBuilder::new(options(HostPlatform::Windows, true)).build(&report);

        assert_eq!(plan.toolchain, Some(Toolchain::Mingw64));
        assert_eq!(plan.output_mode, OutputMode::SingleFile);

        let binary = plan
            .entries
            .iter()
            .find(|e| matches!(e, InclusionEntry::Binary { .. }))
            .expect("rclone binary entry");
        assert_eq!(
            binary,
            &InclusionEntry::binary(dir.path().join("rclone.exe"), "rclone_bin/rclone.exe")
        );
        assert!(plan.warnings.iter().all(|w| w.component != "rclone"));
    }

    #[test]
    fn test_posix_does_not_match_windows_executable() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("rclone.exe").write_str("MZ").unwrap();

        let mut report = empty_report();
        report.cloud_sync = cloud_sync_at(dir.path());

        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);

        assert!(!plan
            .entries
            .iter()
            .any(|e| matches!(e, InclusionEntry::Binary { .. })));
        let warning = plan.warnings.iter().find(|w| w.component == "rclone").unwrap();
        assert!(warning.message.contains("no rclone in"));
    }

    #[test]
    fn test_pyinstaller_never_gets_toolchain_override() {
        let mut opts = options(HostPlatform::Windows, false);
        opts.backend = Backend::PyInstaller;

        let plan = PlanBuilder::new(opts).build(&empty_report());
        assert_eq!(plan.toolchain, None);
    }

    #[test]
    fn test_missing_transport_warns_and_driver_alone_is_included() {
        let gphoto = Path::new("/venv/site-packages/gphoto2");
        let mut report = empty_report();
        report.camera.locations = vec![location(
            CAMERA_DRIVER_PATTERN,
            gphoto,
            "libs/libgphoto2",
        )];

        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);

        assert!(plan.warnings.iter().any(|w| w.component == "gphoto2"));
        assert!(plan
            .entries
            .contains(&InclusionEntry::data_dir(
                gphoto.join("libs/libgphoto2"),
                "gphoto2/libs/libgphoto2"
            )));
    }

    #[test]
    fn test_driver_absence_is_silent() {
        let gphoto = Path::new("/venv/site-packages/gphoto2");
        let mut report = empty_report();
        report.camera.locations = vec![location(
            CAMERA_TRANSPORT_PATTERN,
            gphoto,
            "libgphoto2_port",
        )];

        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);
        assert!(plan.warnings.iter().all(|w| w.component != "gphoto2"));
    }

    #[test]
    fn test_absent_acceleration_module_is_silent() {
        let mut report = empty_report();
        report.acceleration[0].present = true;

        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);

        let modules: Vec<&str> = plan.import_modules().collect();
        assert!(modules.contains(&ACCELERATION_MODULES[0]));
        for absent in &ACCELERATION_MODULES[1..] {
            assert!(!modules.contains(absent));
        }
        assert!(plan
            .warnings
            .iter()
            .all(|w| !ACCELERATION_MODULES.contains(&w.component.as_str())));
        assert_eq!(plan.warnings.len(), 2);
    }

    #[test]
    fn test_plugins_present_regardless_of_probes() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("rclone").write_str("").unwrap();

        let mut full = empty_report();
        full.cloud_sync = cloud_sync_at(dir.path());
        for module in &mut full.acceleration {
            module.present = true;
        }

        for report in [empty_report(), full] {
            let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&report);
            let modules: Vec<&str> = plan.import_modules().collect();
            for plugin in plugins::PLUGINS {
                assert!(modules.contains(&plugin.module().as_str()), "{}", plugin.id);
            }
        }
    }

    #[test]
    fn test_planning_is_deterministic() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("rclone").write_str("").unwrap();

        let mut report = empty_report();
        report.cloud_sync = cloud_sync_at(dir.path());
        report.acceleration[1].present = true;

        let builder = PlanBuilder::new(options(HostPlatform::Linux, true));
        let first = builder.build(&report);
        let second = builder.build(&report);

        assert_eq!(first.entries, second.entries);
        assert_eq!(
            serde_json::to_vec(&first.entries).unwrap(),
            serde_json::to_vec(&second.entries).unwrap()
        );
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_entry_order() {
        let plan = PlanBuilder::new(options(HostPlatform::Linux, false)).build(&empty_report());

        let kinds: Vec<&str> = plan.entries.iter().map(|e| e.kind()).collect();
        let static_count = layout::static_entries().len();
        assert_eq!(&plan.entries[..static_count], &layout::static_entries()[..]);
        assert_eq!(kinds[static_count], "import_module");
        assert_eq!(&plan.entries[static_count..], &plugins::plugin_entries()[..]);
    }

    #[tokio::test]
    async fn test_build_from_gathered_report() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("rclone").write_str("").unwrap();
        let probe = CannedProbe::default()
            .with_root("rclone", dir.path().to_path_buf())
            .with_module("httptools");

        let report = ProbeReport::gather(&probe).await;
        let plan = PlanBuilder::new(options(HostPlatform::Darwin, false)).build(&report);

        assert!(plan
            .entries
            .contains(&InclusionEntry::binary(dir.path().join("rclone"), "rclone_bin/rclone")));
        assert!(plan.import_modules().any(|m| m == "httptools"));
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].component, "gphoto2");
    }

    #[test]
    fn test_bundle_path() {
        assert_eq!(
            bundle_path("gphoto2", Path::new("libs/libgphoto2_port")),
            "gphoto2/libs/libgphoto2_port"
        );
        assert_eq!(bundle_path("gphoto2", Path::new("")), "gphoto2");
    }
}
