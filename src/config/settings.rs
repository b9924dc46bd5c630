//! Applet configuration file.
//!
//! Configuration is stored as TOML under the user's config directory,
//! e.g. `~/.config/remmina-applet/applet.toml` on Linux. Preferences live at
//! the top level; everything else is grouped into tables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::applet::Orientation;
use crate::config::Preferences;
use crate::error::Result;

/// Where the companion installs its `remmina-*` protocol icons.
pub const DEFAULT_ICON_THEME_PATH: &str = "/usr/share/remmina/icons";

/// mDNS service type browsed for VNC servers.
pub const DEFAULT_SERVICE_TYPE: &str = "_rfb._tcp.local.";

/// Full applet configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub preferences: Preferences,

    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub panel: PanelSettings,
}

/// Filesystem locations and the companion program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory holding `*.remmina` profiles. Defaults to `~/.remmina`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// Program started for every launch request.
    #[serde(default = "default_launcher")]
    pub launcher: PathBuf,

    /// Extra icon theme directory searched for the `remmina-*` icons.
    #[serde(default = "default_icon_theme_path")]
    pub icon_theme_path: PathBuf,
}

fn default_icon_theme_path() -> PathBuf {
    PathBuf::from(DEFAULT_ICON_THEME_PATH)
}

fn default_launcher() -> PathBuf {
    PathBuf::from("remmina")
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            profile_dir: None,
            launcher: default_launcher(),
            icon_theme_path: default_icon_theme_path(),
        }
    }
}

impl PathSettings {
    /// Returns the configured profile directory or `~/.remmina`.
    pub fn profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".remmina"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_service_type")]
    pub service_type: String,

    /// Protocol handed to the launcher for discovered hosts.
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_service_type() -> String {
    DEFAULT_SERVICE_TYPE.into()
}

fn default_protocol() -> String {
    "VNC".into()
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            service_type: default_service_type(),
            protocol: default_protocol(),
        }
    }
}

/// Panel geometry known up front.
///
/// StatusNotifierItem hosts never report the applet allocation, so the
/// runtime feeds this as the initial resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default = "default_panel_size")]
    pub size: u32,

    #[serde(default = "default_screen_width")]
    pub screen_width: u32,

    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

fn default_panel_size() -> u32 {
    24
}

fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            size: default_panel_size(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

/// Loads and saves [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn default_location() -> Self {
        Self::new(default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("remmina-applet")
        .join("applet.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.preferences, Preferences::default());
        assert_eq!(config.paths.launcher, PathBuf::from("remmina"));
        assert_eq!(config.discovery.service_type, "_rfb._tcp.local.");
        assert_eq!(config.discovery.protocol, "VNC");
        assert_eq!(config.panel.size, 24);
        assert_eq!(config.panel.orientation, Orientation::Up);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let text = r#"
            applet_quick_ontop = true

            [panel]
            orientation = "left"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert!(config.preferences.quick_on_top);
        assert!(!config.preferences.hide_count);
        assert_eq!(config.panel.orientation, Orientation::Left);
        assert_eq!(config.panel.screen_width, 1920);
        assert_eq!(config.paths.launcher, PathBuf::from("remmina"));
    }

    #[test]
    fn profile_dir_override() {
        let paths = PathSettings {
            profile_dir: Some("/srv/profiles".into()),
            ..PathSettings::default()
        };
        assert_eq!(paths.profile_dir(), PathBuf::from("/srv/profiles"));
        assert!(PathSettings::default().profile_dir().ends_with(".remmina"));
    }

    #[test]
    fn icon_theme_path_configurable() {
        assert_eq!(
            PathSettings::default().icon_theme_path,
            PathBuf::from("/usr/share/remmina/icons")
        );

        let text = r#"
            [paths]
            icon_theme_path = "/opt/remmina/share/icons"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(
            config.paths.icon_theme_path,
            PathBuf::from("/opt/remmina/share/icons")
        );
        assert_eq!(config.paths.launcher, PathBuf::from("remmina"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("absent.toml"));
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("nested").join("applet.toml"));

        let mut config = Config::default();
        config.preferences.enable_discovery = true;
        config.paths.profile_dir = Some(tmp.path().to_path_buf());
        config.panel.size = 48;

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("applet.toml");
        std::fs::write(&path, "applet_hide_count = maybe").unwrap();
        assert!(ConfigStore::new(path).load().is_err());
    }
}
