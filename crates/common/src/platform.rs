//! Host platform classification and per-platform packaging defaults.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Host operating system family, as far as packaging cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    Darwin,
    /// Linux and every other POSIX-like host.
    Linux,
}

/// Compiler toolchain override for the native-compiling backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// MinGW-w64, used instead of requiring an MSVC installation.
    Mingw64,
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toolchain::Mingw64 => write!(f, "mingw64"),
        }
    }
}

/// Platform-specific conventions used throughout planning and invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDefaults {
    /// Suffix appended to executable names.
    pub exe_suffix: &'static str,
    /// Interpreter location relative to the project root.
    pub interpreter_subpath: &'static [&'static str],
    /// Separator between source and destination in PyInstaller's `--add-data`.
    pub data_separator: char,
    /// Toolchain the native-compiling backend should be told to use.
    pub toolchain: Option<Toolchain>,
}

const WINDOWS_DEFAULTS: PlatformDefaults = PlatformDefaults {
    exe_suffix: ".exe",
    interpreter_subpath: &[".venv", "Scripts", "python.exe"],
    data_separator: ';',
    toolchain: Some(Toolchain::Mingw64),
};

const POSIX_DEFAULTS: PlatformDefaults = PlatformDefaults {
    exe_suffix: "",
    interpreter_subpath: &[".venv", "bin", "python"],
    data_separator: ':',
    toolchain: None,
};

impl HostPlatform {
    /// Classify a raw OS identifier (`sys.platform`, `std::env::consts::OS`, `uname -s`, ...).
    ///
    /// Unknown identifiers fall through to [`HostPlatform::Linux`].
    pub fn classify(raw: &str) -> Self {
        let id = raw.trim().to_lowercase();

        let windows = id == "nt"
            || id.starts_with("win")
            || id.starts_with("cygwin")
            || id.starts_with("msys")
            || id.starts_with("mingw");
        if windows {
            return HostPlatform::Windows;
        }

        if matches!(id.as_str(), "darwin" | "macos" | "mac" | "osx" | "mac os x" | "macosx") {
            return HostPlatform::Darwin;
        }

        HostPlatform::Linux
    }

    /// Classify the explicit override if one is given, otherwise the host this binary runs on.
    pub fn detect(override_id: Option<&str>) -> Self {
        let platform = match override_id {
            Some(id) if !id.trim().is_empty() => Self::classify(id),
            _ => Self::classify(std::env::consts::OS),
        };
        tracing::debug!("Host platform: {}", platform);
        platform
    }

    /// Lookup table entry for this platform.
    pub fn defaults(&self) -> &'static PlatformDefaults {
        match self {
            HostPlatform::Windows => &WINDOWS_DEFAULTS,
            HostPlatform::Darwin | HostPlatform::Linux => &POSIX_DEFAULTS,
        }
    }

    /// Executable file name for `stem` on this platform.
    pub fn executable_name(&self, stem: &str) -> String {
        format!("{}{}", stem, self.defaults().exe_suffix)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::Darwin => write!(f, "darwin"),
            HostPlatform::Linux => write!(f, "linux"),
        }
    }
}

impl FromStr for HostPlatform {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::classify(s))
    }
}
