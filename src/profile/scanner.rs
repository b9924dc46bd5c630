//! Profile directory scanning.

use std::path::Path;

use crate::error::Result;
use crate::profile::{PROFILE_EXTENSION, ProfileEntry};

/// Lists the profiles stored directly in `dir`.
///
/// A missing directory yields an empty list. Entries without the profile
/// suffix are ignored, and unreadable profiles are skipped with a warning.
/// The result is in directory order; callers sort it.
pub fn scan_profiles(dir: &Path) -> Vec<ProfileEntry> {
    match try_scan(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "profile directory not readable");
            Vec::new()
        }
    }
}

fn try_scan(dir: &Path) -> Result<Vec<ProfileEntry>> {
    let mut entries = Vec::new();

    for dirent in std::fs::read_dir(dir)? {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = dirent.path();
        let has_suffix = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(PROFILE_EXTENSION) && n.len() > PROFILE_EXTENSION.len());
        if !has_suffix || !path.is_file() {
            continue;
        }

        match ProfileEntry::load(&path) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable profile");
            }
        }
    }

    tracing::debug!(dir = %dir.display(), count = entries.len(), "scanned profiles");
    Ok(entries)
}
