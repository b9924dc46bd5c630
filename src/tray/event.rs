//! Events delivered to the applet's main loop.
//!
//! The tray service and the discovery thread run off the main loop; they
//! only ever talk to it through these messages.

use crate::discovery::DiscoveryEvent;
use crate::menu::MenuAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// The host is about to show the root menu, i.e. the icon was clicked.
    MenuOpened,
    /// Secondary activation (usually middle click) at screen position (x, y).
    SecondaryActivated { x: i32, y: i32 },
    /// A standard menu row was activated.
    MenuActivated(MenuAction),
    /// A checkmark row was toggled to the given state.
    CheckmarkToggled(String, bool),
    /// The set of discovered services changed.
    DiscoveryChanged(DiscoveryEvent),
    /// The tray can no longer be shown and the applet should exit.
    Shutdown,
}
