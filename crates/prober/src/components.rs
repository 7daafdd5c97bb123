//! Optional components the prober knows how to look for.
//!
//! This is the single source of truth for what gets probed and for the
//! interpreter-side scripts that do the probing.

/// Role of the only path a single-path probe returns.
pub const ROOT_ROLE: &str = "root";

/// Camera library sub-tree holding the I/O transport (port) drivers.
pub const CAMERA_TRANSPORT_PATTERN: &str = "libgphoto2_port";

/// Camera library sub-tree holding the per-model camera drivers.
pub const CAMERA_DRIVER_PATTERN: &str = "libgphoto2";

/// How a component's installed location is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeShape {
    /// The install root itself.
    Single,
    /// One directory per pattern, found by name below the install root.
    Multi(&'static [&'static str]),
}

/// An optional component installed into the target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Name used in logs and warnings.
    pub name: &'static str,
    /// Importable name the interpreter resolves.
    pub import_name: &'static str,
    pub shape: ProbeShape,
}

/// Cloud-sync executable shipped by the `rclone_bin` distribution.
pub const CLOUD_SYNC: ComponentSpec = ComponentSpec {
    name: "rclone",
    import_name: "rclone_bin",
    shape: ProbeShape::Single,
};

/// Camera-control library with its bundled native plugin trees.
pub const CAMERA: ComponentSpec = ComponentSpec {
    name: "gphoto2",
    import_name: "gphoto2",
    shape: ProbeShape::Multi(&[CAMERA_TRANSPORT_PATTERN, CAMERA_DRIVER_PATTERN]),
};

/// Optional acceleration sub-modules, checked for existence only.
///
/// Event-loop and HTTP parser speedups, websocket masking, hardware-codec
/// side data and the turbo JPEG codecs.
pub const ACCELERATION_MODULES: &[&str] = &[
    "uvloop",
    "httptools",
    "websockets.speedups",
    "av.sidedata.encparams",
    "av.sidedata.motionvectors",
    "simplejpeg",
    "turbojpeg",
];

/// Prints the install root of the module named in `sys.argv[1]`, or nothing.
pub const LOCATE_SCRIPT: &str = r#"import importlib.util, os, sys
try:
    spec = importlib.util.find_spec(sys.argv[1])
except Exception:
    spec = None
if spec is not None:
    locations = list(spec.submodule_search_locations or [])
    if locations:
        print(locations[0])
    elif spec.origin and os.path.exists(spec.origin):
        print(os.path.dirname(spec.origin))
"#;

/// Prints `1` when the module named in `sys.argv[1]` can be found, `0` otherwise.
///
/// A missing parent package raises inside `find_spec`; that counts as absent.
pub const EXISTS_SCRIPT: &str = r#"import importlib.util, sys
try:
    found = importlib.util.find_spec(sys.argv[1]) is not None
except Exception:
    found = False
print("1" if found else "0")
"#;
