//! Side effects requested by the applet shell.

use crate::applet::geometry::Point;
use crate::config::Preferences;
use crate::launcher::LaunchRequest;
use crate::menu::PopupMenu;

/// A side effect for the host to perform, in the order returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Render the panel icon at this pixel size.
    SetIconSize(u32),
    /// Open `menu` at `position`.
    ShowMenu { menu: PopupMenu, position: Point },
    /// Replace the menu contents without reopening it.
    UpdateMenu(PopupMenu),
    CloseMenu,
    /// Start the companion application.
    Launch(LaunchRequest),
    /// Start browsing unless already started.
    StartDiscovery,
    StopDiscovery,
    /// Persist the preferences.
    SavePreferences(Preferences),
}
