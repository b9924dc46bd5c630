//! Per-applet state.

use std::time::Instant;

use crate::applet::geometry::{Orientation, Size};
use crate::config::{PanelSettings, Preferences};
use crate::menu::PopupMenu;

/// Icon size before the first allocation arrives.
pub const INITIAL_ICON_SIZE: u32 = 16;

/// Whether a popup is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    MenuOpen,
}

/// The popup owned by the applet while it is open.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    pub menu: PopupMenu,
    /// Time of the click that opened it.
    pub opened_at: Instant,
}

/// Everything the shell remembers between events.
///
/// `prev_size` is the last panel extent that produced a `SetIconSize`; the
/// phase is derived from whether `popup` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct AppletState {
    pub icon_size: u32,
    /// Last panel extent applied to the icon, 0 before the first resize.
    pub prev_size: u32,
    pub allocation: Size,
    pub orientation: Orientation,
    pub screen: Size,
    pub popup: Option<OpenPopup>,
    pub preferences: Preferences,
}

impl AppletState {
    pub fn new(preferences: Preferences, panel: &PanelSettings) -> Self {
        Self {
            icon_size: INITIAL_ICON_SIZE,
            prev_size: 0,
            allocation: Size::default(),
            orientation: panel.orientation,
            screen: Size::new(panel.screen_width, panel.screen_height),
            popup: None,
            preferences,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.popup.is_some() {
            Phase::MenuOpen
        } else {
            Phase::Idle
        }
    }
}
