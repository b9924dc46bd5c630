//! Popup menu construction.
//!
//! The popup is built in three steps: collect every item, sort them with
//! [`compare`], then walk the sorted list once, opening a new submenu
//! whenever the group label changes. Quick Connect and a separator go on top
//! or at the bottom depending on the preferences.

use crate::applet::Size;
use crate::config::Preferences;
use crate::discovery::DiscoveredService;
use crate::menu::item::{ItemType, MenuItem, compare};
use crate::menu::node::{DISCOVERY_TOGGLE_ID, MenuAction, MenuNode};
use crate::profile::ProfileEntry;

/// Options affecting popup layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuOptions {
    pub quick_on_top: bool,
    pub hide_count: bool,
}

impl From<&Preferences> for MenuOptions {
    fn from(prefs: &Preferences) -> Self {
        Self {
            quick_on_top: prefs.quick_on_top,
            hide_count: prefs.hide_count,
        }
    }
}

/// A top-level entry of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEntry {
    Item(MenuItem),
    Group {
        name: String,
        /// Displayed label, the name optionally followed by the item count.
        label: String,
        icon_name: &'static str,
        items: Vec<MenuItem>,
    },
    Separator,
}

/// Sizes used to estimate how large the popup renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuMetrics {
    pub row_height: u32,
    pub separator_height: u32,
    pub char_width: u32,
    /// Horizontal space taken by icon, padding and submenu arrow.
    pub padding: u32,
    pub min_width: u32,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        Self {
            row_height: 26,
            separator_height: 9,
            char_width: 8,
            padding: 64,
            min_width: 160,
        }
    }
}

/// The assembled popup menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupMenu {
    entries: Vec<PopupEntry>,
}

impl PopupMenu {
    pub fn entries(&self) -> &[PopupEntry] {
        &self.entries
    }

    /// Every item in display order, groups flattened.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().flat_map(|entry| match entry {
            PopupEntry::Item(item) => std::slice::from_ref(item),
            PopupEntry::Group { items, .. } => items.as_slice(),
            PopupEntry::Separator => [].as_slice(),
        })
    }

    /// Estimated on-screen size of the top level.
    pub fn estimated_size(&self, metrics: &MenuMetrics) -> Size {
        let mut height = 0;
        let mut longest = 0;
        for entry in &self.entries {
            match entry {
                PopupEntry::Separator => height += metrics.separator_height,
                PopupEntry::Item(item) => {
                    height += metrics.row_height;
                    longest = longest.max(item.name().chars().count());
                }
                PopupEntry::Group { label, .. } => {
                    height += metrics.row_height;
                    longest = longest.max(label.chars().count());
                }
            }
        }
        let width = (longest as u32 * metrics.char_width + metrics.padding).max(metrics.min_width);
        Size::new(width, height)
    }

    /// Renders the popup into menu nodes.
    pub fn to_nodes(&self) -> Vec<MenuNode> {
        self.entries
            .iter()
            .map(|entry| match entry {
                PopupEntry::Item(item) => item_node(item),
                PopupEntry::Group {
                    label,
                    icon_name,
                    items,
                    ..
                } => MenuNode::SubMenu {
                    label: label.clone(),
                    icon_name: (*icon_name).to_string(),
                    submenu: items.iter().map(item_node).collect(),
                },
                PopupEntry::Separator => MenuNode::Separator,
            })
            .collect()
    }
}

fn item_node(item: &MenuItem) -> MenuNode {
    MenuNode::Standard {
        label: item.name().to_string(),
        icon_name: item.icon_name(),
        action: MenuAction::Open(item.clone()),
    }
}

/// Sorts items into popup order. The sort is stable.
pub fn sort_items(items: &mut [MenuItem]) {
    items.sort_by(compare);
}

/// Walks sorted items once, clustering each run of equal group labels into
/// one submenu entry. Ungrouped items stay at the top level.
pub fn group_items(sorted: Vec<MenuItem>, options: MenuOptions) -> Vec<PopupEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<MenuItem>)> = None;

    for item in sorted {
        let Some(group) = item.group().map(str::to_string) else {
            flush_group(&mut entries, current.take(), options);
            entries.push(PopupEntry::Item(item));
            continue;
        };

        match current.as_mut() {
            Some((name, items)) if *name == group => items.push(item),
            _ => {
                flush_group(&mut entries, current.replace((group, vec![item])), options);
            }
        }
    }
    flush_group(&mut entries, current, options);

    entries
}

fn flush_group(
    entries: &mut Vec<PopupEntry>,
    group: Option<(String, Vec<MenuItem>)>,
    options: MenuOptions,
) {
    let Some((name, items)) = group else {
        return;
    };

    let label = if options.hide_count {
        name.clone()
    } else {
        format!("{name} ({})", items.len())
    };
    let icon_name = match items.first().map(MenuItem::item_type) {
        Some(ItemType::Discovered) => "folder-remote",
        _ => "folder",
    };

    entries.push(PopupEntry::Group {
        name,
        label,
        icon_name,
        items,
    });
}

/// Builds the popup from the saved profiles and the discovery snapshot.
pub fn build_popup(
    profiles: Vec<ProfileEntry>,
    discovered: Vec<DiscoveredService>,
    options: MenuOptions,
) -> PopupMenu {
    let mut items: Vec<MenuItem> = profiles
        .into_iter()
        .map(MenuItem::SavedFile)
        .chain(discovered.into_iter().map(MenuItem::Discovered))
        .collect();
    sort_items(&mut items);

    let grouped = group_items(items, options);

    let mut entries = Vec::with_capacity(grouped.len() + 2);
    if options.quick_on_top {
        entries.push(PopupEntry::Item(MenuItem::QuickConnect));
        entries.push(PopupEntry::Separator);
        entries.extend(grouped);
    } else {
        entries.extend(grouped);
        entries.push(PopupEntry::Separator);
        entries.push(PopupEntry::Item(MenuItem::QuickConnect));
    }

    PopupMenu { entries }
}

/// Applet-level actions listed after the popup rows.
pub fn context_section(discovery_enabled: bool) -> Vec<MenuNode> {
    let standard = |label: &str, icon_name: &str, action| MenuNode::Standard {
        label: label.to_string(),
        icon_name: icon_name.to_string(),
        action,
    };

    vec![
        MenuNode::Separator,
        standard("Open Main Window", "system-run", MenuAction::OpenMain),
        standard("Preferences", "preferences-system", MenuAction::Preferences),
        standard("About", "help-about", MenuAction::About),
        MenuNode::Separator,
        MenuNode::Checkmark {
            id: DISCOVERY_TOGGLE_ID.to_string(),
            label: "Enable Service Discovery".to_string(),
            icon_name: String::new(),
            checked: discovery_enabled,
        },
        MenuNode::Separator,
        standard("Quit", "application-exit", MenuAction::Quit),
    ]
}
