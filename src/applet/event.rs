//! Events handled by the applet shell.

use std::time::Instant;

use crate::applet::geometry::{Orientation, Point, Size};
use crate::menu::MenuItem;

/// Mouse button of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    /// Secondary activation of the tray icon, usually the middle button.
    Middle,
    /// Context click on a popup row.
    Secondary,
}

/// Applet-level actions outside the popup rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    OpenMain,
    Preferences,
    About,
}

/// Input to [`Applet::handle`](crate::applet::Applet::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum AppletEvent {
    /// The panel gave the applet a new allocation.
    Resize(Size),
    OrientationChanged(Orientation),
    /// The applet icon was clicked at screen position `anchor`.
    Click {
        button: Button,
        anchor: Point,
        at: Instant,
    },
    /// The popup closed without a selection.
    Dismiss { at: Instant },
    ItemActivated { item: MenuItem, button: Button },
    Context(ContextAction),
    DiscoveryToggled(bool),
    /// Profiles or discovered services may have changed.
    Refresh,
    Teardown,
}
