//! Preferences and configuration file handling.

pub mod prefs;
pub mod settings;

pub use prefs::{PrefKey, Preferences, UnknownPrefKey};
pub use settings::{
    Config, ConfigStore, DEFAULT_ICON_THEME_PATH, DEFAULT_SERVICE_TYPE, DiscoverySettings,
    PanelSettings, PathSettings,
};
