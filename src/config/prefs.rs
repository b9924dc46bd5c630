//! Typed applet preferences.
//!
//! The companion application addresses these settings by string key, so the
//! struct keeps the historical key names on disk while the applet itself only
//! deals with typed fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Boolean preferences that influence the applet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Drop the "(n)" item count from group submenu labels.
    #[serde(rename = "applet_hide_count", default)]
    pub hide_count: bool,

    /// Put Quick Connect at the top of the popup instead of the bottom.
    #[serde(rename = "applet_quick_ontop", default)]
    pub quick_on_top: bool,

    /// Browse the local network for remote desktops.
    #[serde(rename = "applet_enable_avahi", default)]
    pub enable_discovery: bool,
}

/// String keys under which preferences are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    HideCount,
    QuickOnTop,
    EnableDiscovery,
}

impl PrefKey {
    pub const ALL: [PrefKey; 3] = [
        PrefKey::HideCount,
        PrefKey::QuickOnTop,
        PrefKey::EnableDiscovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::HideCount => "applet_hide_count",
            PrefKey::QuickOnTop => "applet_quick_ontop",
            PrefKey::EnableDiscovery => "applet_enable_avahi",
        }
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known preference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference key: {0}")]
pub struct UnknownPrefKey(pub String);

impl FromStr for PrefKey {
    type Err = UnknownPrefKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrefKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownPrefKey(s.to_string()))
    }
}

impl Preferences {
    pub fn get(&self, key: PrefKey) -> bool {
        match key {
            PrefKey::HideCount => self.hide_count,
            PrefKey::QuickOnTop => self.quick_on_top,
            PrefKey::EnableDiscovery => self.enable_discovery,
        }
    }

    pub fn set(&mut self, key: PrefKey, value: bool) {
        let slot = match key {
            PrefKey::HideCount => &mut self.hide_count,
            PrefKey::QuickOnTop => &mut self.quick_on_top,
            PrefKey::EnableDiscovery => &mut self.enable_discovery,
        };
        *slot = value;
    }

    /// Looks a preference up by its stored key name.
    pub fn get_by_name(&self, name: &str) -> Result<bool, UnknownPrefKey> {
        Ok(self.get(name.parse()?))
    }

    /// Sets a preference by its stored key name.
    pub fn set_by_name(&mut self, name: &str, value: bool) -> Result<(), UnknownPrefKey> {
        self.set(name.parse()?, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off() {
        let prefs = Preferences::default();
        for key in PrefKey::ALL {
            assert!(!prefs.get(key), "{key} should default to false");
        }
    }

    #[test]
    fn set_then_get_each_key() {
        for key in PrefKey::ALL {
            let mut prefs = Preferences::default();
            prefs.set(key, true);
            assert!(prefs.get(key));
            let others = PrefKey::ALL.into_iter().filter(|k| *k != key);
            for other in others {
                assert!(!prefs.get(other));
            }
        }
    }

    #[test]
    fn key_names_parse_back() {
        for key in PrefKey::ALL {
            assert_eq!(key.as_str().parse::<PrefKey>(), Ok(key));
        }
        assert_eq!(
            "applet_show_everything".parse::<PrefKey>(),
            Err(UnknownPrefKey("applet_show_everything".into()))
        );
    }

    #[test]
    fn by_name_access() {
        let mut prefs = Preferences::default();
        prefs.set_by_name("applet_quick_ontop", true).unwrap();
        assert!(prefs.quick_on_top);
        assert_eq!(prefs.get_by_name("applet_quick_ontop"), Ok(true));
        assert!(prefs.set_by_name("bogus", true).is_err());
    }

    #[test]
    fn serializes_with_stored_key_names() {
        let prefs = Preferences {
            hide_count: true,
            quick_on_top: false,
            enable_discovery: true,
        };
        let text = toml::to_string(&prefs).unwrap();
        assert!(text.contains("applet_hide_count = true"));
        assert!(text.contains("applet_quick_ontop = false"));
        assert!(text.contains("applet_enable_avahi = true"));
    }
}
