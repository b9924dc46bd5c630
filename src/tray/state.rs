//! Tray state management.
//!
//! This module holds what the tray shows (icon, tooltip and the rendered menu
//! tree) and converts the menu tree into ksni items whose callbacks post
//! [`TrayEvent`]s back to the main loop. With a [`MenuSource`] attached, the
//! menu can also be rebuilt on the ksni thread right before the host shows it.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};

use ksni::menu::*;

use crate::applet::MenuSource;
use crate::applet::state::INITIAL_ICON_SIZE;
use crate::config::Preferences;
use crate::menu::{ItemType, MenuNode, MenuOptions, PopupMenu, build_popup, context_section};
use crate::tray::event::TrayEvent;
use crate::tray::ksni_impl::KsniTray;

/// Internal state of the tray icon.
pub struct TrayState {
    /// Unique identifier for this tray icon.
    pub tray_id: String,
    /// The name of the icon from the freedesktop icon theme.
    pub icon_name: String,
    /// Extra directory searched for the icon.
    pub icon_theme_path: String,
    /// Pixel size last chosen for the panel.
    pub icon_size: u32,
    pub title: String,
    pub tooltip_title: String,
    pub tooltip_subtitle: String,
    /// Popup rows followed by the applet actions.
    pub menu: Vec<MenuNode>,
    /// Preferences the menu is rendered with.
    pub preferences: Preferences,
    /// Where popup rows come from when the menu is rebuilt in place.
    pub source: Option<Arc<dyn MenuSource + Send + Sync>>,
    /// Channel to the main loop.
    pub event_sender: Option<Sender<TrayEvent>>,
}

impl TrayState {
    pub fn new(tray_id: String) -> Self {
        Self {
            tray_id,
            icon_name: "remmina".to_string(),
            icon_theme_path: String::new(),
            icon_size: INITIAL_ICON_SIZE,
            title: "Remmina Applet".to_string(),
            tooltip_title: "Remmina".to_string(),
            tooltip_subtitle: String::new(),
            menu: Vec::new(),
            preferences: Preferences::default(),
            source: None,
            event_sender: None,
        }
    }

    /// Replaces the menu with `popup` followed by the applet actions.
    pub fn set_menu(&mut self, popup: &PopupMenu) {
        let mut menu = popup.to_nodes();
        menu.extend(context_section(self.preferences.enable_discovery));
        self.menu = menu;
        self.tooltip_subtitle = summary(popup);
    }

    /// Rebuilds the menu from a fresh read of the attached source.
    ///
    /// Returns None when no source is attached.
    pub fn rebuild_menu(&mut self) -> Option<PopupMenu> {
        let source = self.source.clone()?;
        let popup = build_popup(
            source.profiles(),
            source.discovered(),
            MenuOptions::from(&self.preferences),
        );
        self.set_menu(&popup);
        Some(popup)
    }

    /// Finds a checkmark item by ID and toggles its state.
    ///
    /// Returns the new checked state if found, or None if not found.
    pub fn find_and_toggle_checkmark(&mut self, id: &str) -> Option<bool> {
        let slot = Self::find_checkmark(&mut self.menu, id)?;
        *slot = !*slot;
        Some(*slot)
    }

    fn find_checkmark<'a>(items: &'a mut [MenuNode], id: &str) -> Option<&'a mut bool> {
        for node in items {
            match node {
                MenuNode::Checkmark {
                    id: item_id,
                    checked,
                    ..
                } if item_id == id => return Some(checked),
                MenuNode::SubMenu { submenu, .. } => {
                    if let Some(found) = Self::find_checkmark(submenu, id) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Builds the ksni menu structure from the internal menu data.
    pub fn build_menu_items(&self) -> Vec<MenuItem<KsniTray>> {
        self.menu
            .iter()
            .map(|item| self.build_menu_item(item))
            .collect()
    }

    /// Converts a single node into a ksni MenuItem.
    pub fn build_menu_item(&self, node: &MenuNode) -> MenuItem<KsniTray> {
        match node {
            MenuNode::Standard {
                label,
                icon_name,
                action,
            } => {
                let action = action.clone();
                let sender = self.event_sender.clone();
                StandardItem {
                    label: escape_mnemonic(label),
                    icon_name: icon_name.clone(),
                    activate: Box::new(move |_this: &mut KsniTray| {
                        if let Some(ref tx) = sender {
                            let _ = tx.send(TrayEvent::MenuActivated(action.clone()));
                        }
                    }),
                    ..Default::default()
                }
                .into()
            }
            MenuNode::Checkmark {
                id,
                label,
                icon_name,
                checked,
            } => {
                let id_clone = id.clone();
                let sender = self.event_sender.clone();
                CheckmarkItem {
                    label: escape_mnemonic(label),
                    icon_name: icon_name.clone(),
                    checked: *checked,
                    activate: Box::new(move |this: &mut KsniTray| {
                        let new_checked = lock(&this.state).find_and_toggle_checkmark(&id_clone);

                        if let (Some(tx), Some(checked)) = (&sender, new_checked) {
                            let _ = tx.send(TrayEvent::CheckmarkToggled(id_clone.clone(), checked));
                        }
                    }),
                    ..Default::default()
                }
                .into()
            }
            MenuNode::SubMenu {
                label,
                icon_name,
                submenu,
            } => SubMenu {
                label: escape_mnemonic(label),
                icon_name: icon_name.clone(),
                submenu: submenu
                    .iter()
                    .map(|item| self.build_menu_item(item))
                    .collect(),
                ..Default::default()
            }
            .into(),
            MenuNode::Separator => MenuItem::Separator,
        }
    }
}

/// Locks shared tray state, recovering from a poisoned lock.
pub(crate) fn lock(state: &Mutex<TrayState>) -> MutexGuard<'_, TrayState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Tooltip line counting the connections on offer.
fn summary(menu: &PopupMenu) -> String {
    let count = |kind| menu.items().filter(|i| i.item_type() == kind).count();
    let saved = count(ItemType::SavedFile);
    let discovered = count(ItemType::Discovered);
    match discovered {
        0 => format!("{saved} saved"),
        n => format!("{saved} saved, {n} discovered"),
    }
}

/// dbusmenu treats `_` as a mnemonic marker; profile names may contain it.
fn escape_mnemonic(label: &str) -> String {
    label.replace('_', "__")
}
