//! Probe report - every probe answer a plan is built from.

use boothpack_prober::components::{ACCELERATION_MODULES, CAMERA, CLOUD_SYNC};
use boothpack_prober::{ComponentProbeResult, EnvironmentProbe};
use serde::Serialize;
use tracing::info;

/// Presence of one optional acceleration module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePresence {
    pub module: String,
    pub present: bool,
}

/// Results of all probes of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Cloud-sync distribution (single-path probe).
    pub cloud_sync: ComponentProbeResult,
    /// Camera library (multi-path probe).
    pub camera: ComponentProbeResult,
    /// Acceleration modules, in table order.
    pub acceleration: Vec<ModulePresence>,
}

impl ProbeReport {
    /// Run every probe against `probe`.
    ///
    /// The component probes and the acceleration checks run concurrently;
    /// the report always lists results in table order.
    pub async fn gather(probe: &dyn EnvironmentProbe) -> Self {
        info!("Probing optional components...");

        let (cloud_sync, camera, acceleration) = tokio::join!(
            probe.locate(&CLOUD_SYNC),
            probe.locate(&CAMERA),
            Self::gather_acceleration(probe),
        );

        Self {
            cloud_sync,
            camera,
            acceleration,
        }
    }

    async fn gather_acceleration(probe: &dyn EnvironmentProbe) -> Vec<ModulePresence> {
        let mut presence = Vec::with_capacity(ACCELERATION_MODULES.len());
        for module in ACCELERATION_MODULES {
            presence.push(ModulePresence {
                module: module.to_string(),
                present: probe.module_exists(module).await,
            });
        }
        presence
    }

    /// Acceleration modules found in the environment, in table order.
    pub fn present_acceleration(&self) -> impl Iterator<Item = &str> {
        self.acceleration
            .iter()
            .filter(|m| m.present)
            .map(|m| m.module.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use boothpack_prober::components::ROOT_ROLE;
    use boothpack_prober::{ComponentSpec, ProbedLocation};
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;

    /// Probe returning canned answers, for exercising planning without a Python environment.
    #[derive(Default)]
    pub(crate) struct CannedProbe {
        pub(crate) components: HashMap<&'static str, Vec<ProbedLocation>>,
        pub(crate) modules: HashSet<&'static str>,
    }

    impl CannedProbe {
        pub(crate) fn with_root(mut self, component: &'static str, root: PathBuf) -> Self {
            self.components.insert(
                component,
                vec![ProbedLocation {
                    role: ROOT_ROLE.to_string(),
                    path: root,
                    relative: PathBuf::new(),
                }],
            );
            self
        }

        pub(crate) fn with_module(mut self, module: &'static str) -> Self {
            self.modules.insert(module);
            self
        }
    }

    #[async_trait]
    impl EnvironmentProbe for CannedProbe {
        async fn locate(&self, component: &ComponentSpec) -> ComponentProbeResult {
            ComponentProbeResult {
                component: component.name.to_string(),
                locations: self
                    .components
                    .get(component.name)
                    .cloned()
                    .unwrap_or_default(),
            }
        }

        async fn module_exists(&self, module: &str) -> bool {
            self.modules.contains(module)
        }
    }

    #[tokio::test]
    async fn test_gather_keeps_table_order() {
        let probe = CannedProbe::default()
            .with_module("turbojpeg")
            .with_module("uvloop");

        let report = ProbeReport::gather(&probe).await;

        assert_eq!(report.acceleration.len(), ACCELERATION_MODULES.len());
        let present: Vec<&str> = report.present_acceleration().collect();
        assert_eq!(present, vec!["uvloop", "turbojpeg"]);
    }

    #[tokio::test]
    async fn test_gather_empty_environment() {
        let report = ProbeReport::gather(&CannedProbe::default()).await;

        assert!(report.cloud_sync.is_empty());
        assert_eq!(report.cloud_sync.component, "rclone");
        assert!(report.camera.is_empty());
        assert_eq!(report.present_acceleration().count(), 0);
    }

    #[tokio::test]
    async fn test_gather_component_roots() {
        let probe = CannedProbe::default().with_root("rclone", PathBuf::from("/venv/rclone_bin"));

        let report = ProbeReport::gather(&probe).await;
        assert_eq!(
            report.cloud_sync.root(),
            Some(std::path::Path::new("/venv/rclone_bin"))
        );
    }
}
