//! Saved connection profiles.
//!
//! A profile is a `*.remmina` key file in the profile directory. The applet
//! only reads the few values it displays; the file itself is owned by the
//! companion application.

pub mod keyfile;
pub mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use scanner::scan_profiles;

/// File suffix of saved profiles.
pub const PROFILE_EXTENSION: &str = ".remmina";

/// Key-file section holding the profile values.
const PROFILE_SECTION: &str = "remmina";

/// The displayed part of one saved profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Full path of the profile file.
    pub filename: PathBuf,
    /// Display name.
    pub name: String,
    /// Group label, `None` when the profile is ungrouped.
    pub group: Option<String>,
    /// Protocol name as written by the companion, e.g. `RDP`.
    pub protocol: String,
    pub server: Option<String>,
    pub ssh_enabled: bool,
}

impl ProfileEntry {
    /// Reads a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &text))
    }

    /// Builds an entry from profile text. Missing values fall back to the
    /// file stem for the name and to "no group".
    pub fn parse(path: &Path, text: &str) -> Self {
        let mut values = keyfile::read_section(text, PROFILE_SECTION).unwrap_or_default();
        let mut take = |key: &str| values.remove(key).filter(|v| !v.is_empty());

        let name = take("name").unwrap_or_else(|| file_stem(path));
        let group = take("group");
        let protocol = take("protocol").unwrap_or_default();
        let server = take("server");
        let ssh_enabled = take("ssh_enabled").is_some_and(|v| v == "1" || v == "true");

        Self {
            filename: path.to_path_buf(),
            name,
            group,
            protocol,
            server,
            ssh_enabled,
        }
    }

    /// Theme icon for this profile's protocol.
    pub fn icon_name(&self) -> String {
        if self.protocol.is_empty() {
            return "remmina".into();
        }
        let mut icon = format!("remmina-{}", self.protocol.to_lowercase());
        if self.ssh_enabled {
            icon.push_str("-ssh");
        }
        icon
    }
}

fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(PROFILE_EXTENSION)
        .map(str::to_string)
        .unwrap_or(name)
}
