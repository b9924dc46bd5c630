//! Menu item model.
//!
//! A [`MenuItem`] is one actionable row of the popup: Quick Connect, a saved
//! profile or a discovered host. Items are rebuilt for every popup and carry
//! an optional group label used to cluster them into submenus.

use std::cmp::Ordering;

use crate::applet::Button;
use crate::discovery::DiscoveredService;
use crate::launcher::{LaunchMode, LaunchRequest};
use crate::profile::ProfileEntry;

/// Label of the Quick Connect row.
pub const QUICK_CONNECT_LABEL: &str = "Quick Connect";

/// Kind of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    QuickConnect,
    SavedFile,
    Discovered,
}

/// One actionable row of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    QuickConnect,
    SavedFile(ProfileEntry),
    Discovered(DiscoveredService),
}

impl MenuItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            MenuItem::QuickConnect => ItemType::QuickConnect,
            MenuItem::SavedFile(_) => ItemType::SavedFile,
            MenuItem::Discovered(_) => ItemType::Discovered,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            MenuItem::QuickConnect => QUICK_CONNECT_LABEL,
            MenuItem::SavedFile(profile) => &profile.name,
            MenuItem::Discovered(service) => &service.name,
        }
    }

    /// Group label; empty labels count as no group.
    pub fn group(&self) -> Option<&str> {
        let group = match self {
            MenuItem::QuickConnect => None,
            MenuItem::SavedFile(profile) => profile.group.as_deref(),
            MenuItem::Discovered(service) => Some(service.group()),
        };
        group.filter(|g| !g.is_empty())
    }

    pub fn icon_name(&self) -> String {
        match self {
            MenuItem::QuickConnect => "remmina-connect".into(),
            MenuItem::SavedFile(profile) => profile.icon_name(),
            MenuItem::Discovered(_) => "remmina-vnc".into(),
        }
    }

    /// Request sent to the companion when the row is clicked with `button`.
    pub fn launch_request(&self, button: Button) -> LaunchRequest {
        let secondary = button == Button::Secondary;
        match self {
            MenuItem::QuickConnect => LaunchRequest::new(LaunchMode::Quick),
            MenuItem::SavedFile(profile) => {
                let mode = if secondary { LaunchMode::Edit } else { LaunchMode::File };
                LaunchRequest::with_file(mode, &profile.filename)
            }
            MenuItem::Discovered(service) => {
                let mode = if secondary { LaunchMode::New } else { LaunchMode::Quick };
                LaunchRequest::with_server(mode, &service.name, &service.protocol)
            }
        }
    }
}

/// Popup ordering.
///
/// Saved profiles precede discovered hosts. Within each, ungrouped items come
/// before every named group, groups are ordered by label and items by name.
/// Labels compare case-insensitively with an exact-text tie break, so equal
/// groups are always contiguous.
pub fn compare(a: &MenuItem, b: &MenuItem) -> Ordering {
    let discovered = |item: &MenuItem| item.item_type() == ItemType::Discovered;
    discovered(a)
        .cmp(&discovered(b))
        .then_with(|| compare_groups(a.group(), b.group()))
        .then_with(|| compare_text(a.name(), b.name()))
}

fn compare_groups(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_text(a, b),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
