//! Static layout of the application source tree and of the bundle.
//!
//! Everything listed here ships unconditionally. The migration tree is copied
//! verbatim because the packaged application discovers its revisions at
//! runtime and needs the complete, unmodified set.

use boothpack_plan_schema::InclusionEntry;
use std::path::PathBuf;

/// Name of the produced executable.
pub const PRODUCT_NAME: &str = "photobooth";

/// Entry script handed to the backend, relative to the project root.
pub const ENTRY_SCRIPT: &[&str] = &["src", "photobooth_runner.py"];

#[derive(Debug, Clone, Copy)]
enum AssetKind {
    File,
    Dir,
}

#[derive(Debug, Clone, Copy)]
struct StaticAsset {
    kind: AssetKind,
    src: &'static [&'static str],
    dst: &'static str,
}

const STATIC_ASSETS: &[StaticAsset] = &[
    StaticAsset {
        kind: AssetKind::Dir,
        src: &["src", "photobooth", "assets"],
        dst: "photobooth/assets",
    },
    StaticAsset {
        kind: AssetKind::Dir,
        src: &["src", "web", "frontend"],
        dst: "web/frontend",
    },
    StaticAsset {
        kind: AssetKind::Dir,
        src: &["src", "web", "sharepage"],
        dst: "web/sharepage",
    },
    StaticAsset {
        kind: AssetKind::Dir,
        src: &["src", "photobooth", "demoassets"],
        dst: "photobooth/demoassets",
    },
    // database migrations
    StaticAsset {
        kind: AssetKind::File,
        src: &["src", "photobooth", "database", "alembic", "env.py"],
        dst: "photobooth/database/alembic/env.py",
    },
    StaticAsset {
        kind: AssetKind::File,
        src: &["src", "photobooth", "database", "alembic", "script.py.mako"],
        dst: "photobooth/database/alembic/script.py.mako",
    },
    StaticAsset {
        kind: AssetKind::Dir,
        src: &["src", "photobooth", "database", "alembic", "versions"],
        dst: "photobooth/database/alembic/versions",
    },
];

fn native_path(parts: &[&str]) -> PathBuf {
    parts.iter().collect()
}

/// Entry script path with the host's separators.
pub fn entry_script() -> PathBuf {
    native_path(ENTRY_SCRIPT)
}

/// Entries that are always part of the bundle, with project-relative sources.
pub fn static_entries() -> Vec<InclusionEntry> {
    STATIC_ASSETS
        .iter()
        .map(|asset| {
            let src = native_path(asset.src);
            match asset.kind {
                AssetKind::File => InclusionEntry::data_file(src, asset.dst),
                AssetKind::Dir => InclusionEntry::data_dir(src, asset.dst),
            }
        })
        .collect()
}
