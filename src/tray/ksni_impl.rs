//! KSNI tray bridge implementation.
//!
//! This module connects the tray state to the ksni library by implementing
//! the `ksni::Tray` trait. A primary click opens the menu directly; the
//! menu is rebuilt from its source each time the host is about to show it.

use std::sync::{Arc, Mutex};

use ksni::menu::MenuItem;

use crate::tray::event::TrayEvent;
use crate::tray::state::{TrayState, lock};

/// ksni::Tray implementation over the shared tray state.
pub struct KsniTray {
    /// Shared reference to the tray state.
    pub state: Arc<Mutex<TrayState>>,
}

impl KsniTray {
    fn send(&self, event: TrayEvent) {
        if let Some(tx) = &lock(&self.state).event_sender {
            let _ = tx.send(event);
        }
    }
}

impl ksni::Tray for KsniTray {
    const MENU_ON_ACTIVATE: bool = true;

    fn id(&self) -> String {
        lock(&self.state).tray_id.clone()
    }

    fn icon_name(&self) -> String {
        lock(&self.state).icon_name.clone()
    }

    fn icon_theme_path(&self) -> String {
        lock(&self.state).icon_theme_path.clone()
    }

    fn title(&self) -> String {
        lock(&self.state).title.clone()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        let state = lock(&self.state);
        ksni::ToolTip {
            icon_name: state.icon_name.clone(),
            icon_pixmap: vec![],
            title: state.tooltip_title.clone(),
            description: state.tooltip_subtitle.clone(),
        }
    }

    fn category(&self) -> ksni::Category {
        ksni::Category::ApplicationStatus
    }

    fn secondary_activate(&mut self, x: i32, y: i32) {
        self.send(TrayEvent::SecondaryActivated { x, y });
    }

    fn menu_about_to_show(&mut self) {
        let mut state = lock(&self.state);
        state.rebuild_menu();
        if let Some(tx) = &state.event_sender {
            let _ = tx.send(TrayEvent::MenuOpened);
        }
    }

    fn watcher_offline(&self, reason: ksni::OfflineReason) -> bool {
        match reason {
            ksni::OfflineReason::No => {
                tracing::warn!("status notifier watcher went away, waiting for it");
                true
            }
            reason => {
                tracing::error!(?reason, "tray service failed");
                self.send(TrayEvent::Shutdown);
                false
            }
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        lock(&self.state).build_menu_items()
    }
}
