//! First-party plugin allow-list.
//!
//! Plugins are loaded by name at runtime, so import analysis in either
//! backend never sees them. This table must list exactly the plugins the
//! application's plugin registry exposes; bump [`PLUGIN_TABLE_VERSION`]
//! whenever it changes.

use boothpack_plan_schema::InclusionEntry;
use std::collections::HashSet;

/// Version of the plugin registry this table mirrors.
pub const PLUGIN_TABLE_VERSION: u32 = 3;

/// Package all first-party plugins live in.
pub const PLUGIN_PACKAGE: &str = "photobooth.plugins";

/// A plugin identifier and the third-party package it pulls in at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginSpec {
    pub id: &'static str,
    pub dependency: Option<&'static str>,
}

pub const PLUGINS: &[PluginSpec] = &[
    // remote trigger
    PluginSpec {
        id: "commander",
        dependency: None,
    },
    PluginSpec {
        id: "gpio_lights",
        dependency: Some("gpiozero"),
    },
    PluginSpec {
        id: "wled",
        dependency: Some("serial"),
    },
    PluginSpec {
        id: "filter_pilgram2",
        dependency: Some("pilgram2"),
    },
    PluginSpec {
        id: "synchronizer_rclone",
        dependency: Some("rclone_api"),
    },
    PluginSpec {
        id: "synchronizer_legacy",
        dependency: None,
    },
];

impl PluginSpec {
    pub fn module(&self) -> String {
        format!("{}.{}", PLUGIN_PACKAGE, self.id)
    }
}

/// ImportModule entries for every plugin, each followed by its dependency package.
///
/// A dependency shared by several plugins is declared once, after the first
/// plugin that needs it.
pub fn plugin_entries() -> Vec<InclusionEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(PLUGINS.len() * 2);

    for plugin in PLUGINS {
        entries.push(InclusionEntry::import_module(plugin.module()));
        if let Some(dependency) = plugin.dependency {
            if seen.insert(dependency) {
                entries.push(InclusionEntry::import_package(dependency));
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_entries_order() {
        let entries = plugin_entries();
        let rendered: Vec<String> = entries.iter().map(|e| e.to_string()).collect();

        assert_eq!(
            rendered,
            vec![
                "import_module photobooth.plugins.commander",
                "import_module photobooth.plugins.gpio_lights",
                "import_package gpiozero",
                "import_module photobooth.plugins.wled",
                "import_package serial",
                "import_module photobooth.plugins.filter_pilgram2",
                "import_package pilgram2",
                "import_module photobooth.plugins.synchronizer_rclone",
                "import_package rclone_api",
                "import_module photobooth.plugins.synchronizer_legacy",
            ]
        );
    }

    #[test]
    fn test_plugin_ids_unique() {
        let ids: HashSet<&str> = PLUGINS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PLUGINS.len());
    }
}
