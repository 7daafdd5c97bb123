//! Recursive name-match search below a component's install root.

use crate::probe::ProbedLocation;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// For each pattern, find the directory below `root` whose name equals it.
///
/// When several directories match the same pattern, the path whose full
/// string form sorts first wins (plain string order, not per component), so
/// the answer never depends on the order the filesystem enumerates entries in. Patterns without a match are left out;
/// the returned locations follow the order of `patterns`.
pub fn first_match_per_pattern(root: &Path, patterns: &[&str]) -> Vec<ProbedLocation> {
    let mut best: Vec<Option<(String, PathBuf)>> = vec![None; patterns.len()];

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let name = entry.file_name().to_string_lossy();
        for (idx, pattern) in patterns.iter().enumerate() {
            if name != *pattern {
                continue;
            }
            let candidate = entry.path();
            let key = candidate.to_string_lossy().into_owned();
            match &best[idx] {
                Some((current, _)) if *current <= key => {
                    debug!("Ignoring later match {} for {}", candidate.display(), pattern);
                }
                _ => best[idx] = Some((key, candidate.to_path_buf())),
            }
        }
    }

    patterns
        .iter()
        .zip(best)
        .filter_map(|(pattern, found)| {
            let (_, path) = found?;
            let relative = path.strip_prefix(root).ok()?.to_path_buf();
            Some(ProbedLocation {
                role: pattern.to_string(),
                path,
                relative,
            })
        })
        .collect()
}
