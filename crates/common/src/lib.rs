//! Common types shared across boothpack crates.

pub mod error;
pub mod hash;
pub mod naming;
pub mod platform;

pub use error::{Error, Result};
pub use naming::is_module_name;
pub use platform::{HostPlatform, PlatformDefaults, Toolchain};

/// Environment variable naming the interpreter override.
pub const PYTHON_ENV_VAR: &str = "PHOTOBOOTH_PYTHON";
