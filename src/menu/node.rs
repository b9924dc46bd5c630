//! Renderable menu tree.
//!
//! This is what the tray turns into ksni menu items: plain rows, checkmarks,
//! submenus and separators.

use crate::menu::item::MenuItem;

/// Id of the service discovery checkmark.
pub const DISCOVERY_TOGGLE_ID: &str = "enable-discovery";

/// What activating a row asks the applet to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open a popup row.
    Open(MenuItem),
    OpenMain,
    Preferences,
    About,
    Quit,
}

/// A node of the rendered menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuNode {
    /// A clickable row.
    Standard {
        label: String,
        /// Icon name from the freedesktop icon theme.
        icon_name: String,
        action: MenuAction,
    },
    /// A row with a checkmark that toggles on activation.
    Checkmark {
        id: String,
        label: String,
        icon_name: String,
        checked: bool,
    },
    /// A row opening nested items.
    SubMenu {
        label: String,
        icon_name: String,
        submenu: Vec<MenuNode>,
    },
    Separator,
}
