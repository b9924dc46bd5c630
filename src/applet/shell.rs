//! The applet shell.
//!
//! [`Applet::handle`] is the single entry point for panel and menu events. It
//! updates [`AppletState`] and returns the side effects to perform; it never
//! touches the toolkit, the filesystem or the network itself. Menu contents
//! come from a [`MenuSource`] passed in by the caller.

use std::time::{Duration, Instant};

use crate::applet::command::Command;
use crate::applet::event::{AppletEvent, Button, ContextAction};
use crate::applet::geometry::{MIN_ALLOCATION, Point, Size, icon_size_for, panel_extent, popup_position};
use crate::applet::state::{AppletState, OpenPopup};
use crate::config::{PanelSettings, Preferences};
use crate::discovery::DiscoveredService;
use crate::launcher::{LaunchMode, LaunchRequest};
use crate::menu::{MenuItem, MenuMetrics, MenuOptions, PopupMenu, build_popup};
use crate::profile::ProfileEntry;

/// A dismissal this soon after the opening click counts as a request for the
/// main window.
pub const DOUBLE_INTERACTION_THRESHOLD: Duration = Duration::from_millis(500);

/// Where popup rows come from.
pub trait MenuSource {
    fn profiles(&self) -> Vec<ProfileEntry>;
    fn discovered(&self) -> Vec<DiscoveredService>;
}

/// The applet's event handler.
///
/// Feed it [`AppletEvent`]s through [`Applet::handle`] and execute the
/// returned [`Command`]s in order.
pub struct Applet {
    state: AppletState,
    metrics: MenuMetrics,
}

impl Applet {
    pub fn new(preferences: Preferences, panel: &PanelSettings) -> Self {
        Self {
            state: AppletState::new(preferences, panel),
            metrics: MenuMetrics::default(),
        }
    }

    pub fn state(&self) -> &AppletState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.state.preferences
    }

    /// Builds the popup for the current sources and preferences.
    pub fn build_menu(&self, source: &dyn MenuSource) -> PopupMenu {
        build_popup(
            source.profiles(),
            source.discovered(),
            MenuOptions::from(&self.state.preferences),
        )
    }

    /// Applies one event and returns the side effects it calls for.
    pub fn handle(&mut self, event: AppletEvent, source: &dyn MenuSource) -> Vec<Command> {
        match event {
            AppletEvent::Resize(allocation) => self.on_resize(allocation),
            AppletEvent::OrientationChanged(orientation) => {
                self.state.orientation = orientation;
                Vec::new()
            }
            AppletEvent::Click { button, anchor, at } => self.on_click(button, anchor, at, source),
            AppletEvent::Dismiss { at } => self.on_dismiss(at),
            AppletEvent::ItemActivated { item, button } => self.on_item(&item, button),
            AppletEvent::Context(action) => vec![Command::Launch(context_request(action))],
            AppletEvent::DiscoveryToggled(enabled) => self.on_discovery_toggled(enabled),
            AppletEvent::Refresh => self.on_refresh(source),
            AppletEvent::Teardown => self.on_teardown(),
        }
    }

    fn on_resize(&mut self, allocation: Size) -> Vec<Command> {
        let extent = panel_extent(allocation, self.state.orientation);
        if extent < MIN_ALLOCATION || extent == self.state.prev_size {
            return Vec::new();
        }

        self.state.prev_size = extent;
        self.state.allocation = allocation;

        let icon_size = icon_size_for(extent);
        self.state.icon_size = icon_size;
        tracing::debug!(extent, icon_size, "icon resized");
        vec![Command::SetIconSize(icon_size)]
    }

    fn on_click(
        &mut self,
        button: Button,
        anchor: Point,
        at: Instant,
        source: &dyn MenuSource,
    ) -> Vec<Command> {
        if button != Button::Primary {
            return Vec::new();
        }

        let mut commands = Vec::new();
        if let Some(open) = self.state.popup.take() {
            commands.push(Command::CloseMenu);
            if at.saturating_duration_since(open.opened_at) <= DOUBLE_INTERACTION_THRESHOLD {
                tracing::debug!("second click while open, opening main window");
                commands.push(Command::Launch(LaunchRequest::new(LaunchMode::Main)));
                return commands;
            }
        }

        let menu = self.build_menu(source);
        let position = self.position_for(&menu, anchor);
        self.state.popup = Some(OpenPopup {
            menu: menu.clone(),
            opened_at: at,
        });
        commands.push(Command::ShowMenu { menu, position });
        commands
    }

    fn on_dismiss(&mut self, at: Instant) -> Vec<Command> {
        let Some(open) = self.state.popup.take() else {
            return Vec::new();
        };

        let mut commands = vec![Command::CloseMenu];
        if at.saturating_duration_since(open.opened_at) <= DOUBLE_INTERACTION_THRESHOLD {
            commands.push(Command::Launch(LaunchRequest::new(LaunchMode::Main)));
        }
        commands
    }

    fn on_item(&mut self, item: &MenuItem, button: Button) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.state.popup.take().is_some() {
            commands.push(Command::CloseMenu);
        }
        commands.push(Command::Launch(item.launch_request(button)));
        commands
    }

    fn on_discovery_toggled(&mut self, enabled: bool) -> Vec<Command> {
        self.state.preferences.enable_discovery = enabled;
        let lifecycle = if enabled {
            Command::StartDiscovery
        } else {
            Command::StopDiscovery
        };
        vec![Command::SavePreferences(self.state.preferences), lifecycle]
    }

    fn on_refresh(&mut self, source: &dyn MenuSource) -> Vec<Command> {
        let menu = self.build_menu(source);
        if let Some(open) = self.state.popup.as_mut() {
            open.menu = menu.clone();
        }
        vec![Command::UpdateMenu(menu)]
    }

    fn on_teardown(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.state.popup.take().is_some() {
            commands.push(Command::CloseMenu);
        }
        commands.push(Command::StopDiscovery);
        commands
    }

    fn position_for(&self, menu: &PopupMenu, anchor: Point) -> Point {
        let allocation = if self.state.allocation == Size::default() {
            Size::new(self.state.icon_size, self.state.icon_size)
        } else {
            self.state.allocation
        };
        popup_position(
            anchor,
            allocation,
            menu.estimated_size(&self.metrics),
            self.state.screen,
            self.state.orientation,
        )
    }
}

fn context_request(action: ContextAction) -> LaunchRequest {
    let mode = match action {
        ContextAction::OpenMain => LaunchMode::Main,
        ContextAction::Preferences => LaunchMode::Pref,
        ContextAction::About => LaunchMode::About,
    };
    LaunchRequest::new(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applet::geometry::Orientation;
    use crate::applet::state::Phase;

    struct Empty;

    impl MenuSource for Empty {
        fn profiles(&self) -> Vec<ProfileEntry> {
            Vec::new()
        }

        fn discovered(&self) -> Vec<DiscoveredService> {
            Vec::new()
        }
    }

    fn applet() -> Applet {
        Applet::new(Preferences::default(), &PanelSettings::default())
    }

    fn click(applet: &mut Applet, at: Instant) -> Vec<Command> {
        applet.handle(
            AppletEvent::Click {
                button: Button::Primary,
                anchor: Point::new(10, 1050),
                at,
            },
            &Empty,
        )
    }

    fn launches_main(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, Command::Launch(r) if r.mode == LaunchMode::Main))
            .count()
    }

    #[test]
    fn resize_sequence_skips_small_and_repeated() {
        let mut applet = applet();
        let sizes: Vec<_> = [5, 15, 23, 23]
            .into_iter()
            .map(|h| applet.handle(AppletEvent::Resize(Size::new(100, h)), &Empty))
            .collect();

        assert!(sizes[0].is_empty());
        assert_eq!(sizes[1], vec![Command::SetIconSize(16)]);
        assert_eq!(sizes[2], vec![Command::SetIconSize(22)]);
        assert!(sizes[3].is_empty());
        assert_eq!(applet.state().prev_size, 23);
    }

    #[test]
    fn resize_uses_width_on_vertical_panels() {
        let mut applet = applet();
        applet.handle(AppletEvent::OrientationChanged(Orientation::Left), &Empty);
        let commands = applet.handle(AppletEvent::Resize(Size::new(40, 8)), &Empty);
        assert_eq!(commands, vec![Command::SetIconSize(32)]);
    }

    #[test]
    fn click_opens_menu() {
        let mut applet = applet();
        let commands = click(&mut applet, Instant::now());
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::ShowMenu { .. }));
        assert_eq!(applet.state().phase(), Phase::MenuOpen);
    }

    #[test]
    fn secondary_click_ignored() {
        let mut applet = applet();
        let commands = applet.handle(
            AppletEvent::Click {
                button: Button::Secondary,
                anchor: Point::default(),
                at: Instant::now(),
            },
            &Empty,
        );
        assert!(commands.is_empty());
        assert_eq!(applet.state().phase(), Phase::Idle);
    }

    #[test]
    fn fast_dismiss_opens_main_once() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let commands = applet.handle(
            AppletEvent::Dismiss {
                at: t0 + Duration::from_millis(200),
            },
            &Empty,
        );
        assert_eq!(commands[0], Command::CloseMenu);
        assert_eq!(launches_main(&commands), 1);
        assert_eq!(applet.state().phase(), Phase::Idle);

        let again = applet.handle(
            AppletEvent::Dismiss {
                at: t0 + Duration::from_millis(300),
            },
            &Empty,
        );
        assert!(again.is_empty());
    }

    #[test]
    fn slow_dismiss_only_closes() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let commands = applet.handle(
            AppletEvent::Dismiss {
                at: t0 + Duration::from_millis(501),
            },
            &Empty,
        );
        assert_eq!(commands, vec![Command::CloseMenu]);
    }

    #[test]
    fn dismiss_at_threshold_still_opens_main() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let commands = applet.handle(
            AppletEvent::Dismiss {
                at: t0 + DOUBLE_INTERACTION_THRESHOLD,
            },
            &Empty,
        );
        assert_eq!(commands[0], Command::CloseMenu);
        assert_eq!(launches_main(&commands), 1);
    }

    #[test]
    fn second_click_at_threshold_opens_main() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let commands = click(&mut applet, t0 + Duration::from_millis(500));
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::CloseMenu);
        assert_eq!(launches_main(&commands), 1);
        assert_eq!(applet.state().phase(), Phase::Idle);
    }

    #[test]
    fn middle_click_ignored() {
        let mut applet = applet();
        let commands = applet.handle(
            AppletEvent::Click {
                button: Button::Middle,
                anchor: Point::new(5, 5),
                at: Instant::now(),
            },
            &Empty,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn slow_second_click_replaces_menu() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let t1 = t0 + Duration::from_secs(2);
        let commands = click(&mut applet, t1);
        assert_eq!(commands[0], Command::CloseMenu);
        assert!(matches!(commands[1], Command::ShowMenu { .. }));
        assert_eq!(launches_main(&commands), 0);
        assert_eq!(applet.state().popup.as_ref().unwrap().opened_at, t1);
    }

    #[test]
    fn fast_second_click_opens_main() {
        let mut applet = applet();
        let t0 = Instant::now();
        click(&mut applet, t0);

        let commands = click(&mut applet, t0 + Duration::from_millis(100));
        assert_eq!(commands[0], Command::CloseMenu);
        assert_eq!(launches_main(&commands), 1);
        assert_eq!(applet.state().phase(), Phase::Idle);
    }

    #[test]
    fn item_activation_closes_and_launches() {
        let mut applet = applet();
        click(&mut applet, Instant::now());

        let commands = applet.handle(
            AppletEvent::ItemActivated {
                item: MenuItem::QuickConnect,
                button: Button::Primary,
            },
            &Empty,
        );
        assert_eq!(
            commands,
            vec![
                Command::CloseMenu,
                Command::Launch(LaunchRequest::new(LaunchMode::Quick))
            ]
        );
        assert_eq!(applet.state().phase(), Phase::Idle);
    }

    #[test]
    fn context_actions_launch() {
        let mut applet = applet();
        let modes: Vec<_> = [
            ContextAction::OpenMain,
            ContextAction::Preferences,
            ContextAction::About,
        ]
        .into_iter()
        .map(|action| applet.handle(AppletEvent::Context(action), &Empty))
        .collect();
        assert_eq!(
            modes,
            vec![
                vec![Command::Launch(LaunchRequest::new(LaunchMode::Main))],
                vec![Command::Launch(LaunchRequest::new(LaunchMode::Pref))],
                vec![Command::Launch(LaunchRequest::new(LaunchMode::About))],
            ]
        );
    }

    #[test]
    fn discovery_toggle_persists_and_drives_lifecycle() {
        let mut applet = applet();
        let on = applet.handle(AppletEvent::DiscoveryToggled(true), &Empty);
        let expected_prefs = Preferences {
            enable_discovery: true,
            ..Preferences::default()
        };
        assert_eq!(
            on,
            vec![
                Command::SavePreferences(expected_prefs),
                Command::StartDiscovery
            ]
        );

        let off = applet.handle(AppletEvent::DiscoveryToggled(false), &Empty);
        assert_eq!(off[1], Command::StopDiscovery);
        assert!(!applet.preferences().enable_discovery);
    }

    #[test]
    fn refresh_keeps_phase() {
        let mut applet = applet();
        let idle = applet.handle(AppletEvent::Refresh, &Empty);
        assert!(matches!(idle[..], [Command::UpdateMenu(_)]));
        assert_eq!(applet.state().phase(), Phase::Idle);

        let t0 = Instant::now();
        click(&mut applet, t0);
        applet.handle(AppletEvent::Refresh, &Empty);
        assert_eq!(applet.state().phase(), Phase::MenuOpen);
        assert_eq!(applet.state().popup.as_ref().unwrap().opened_at, t0);
    }

    #[test]
    fn teardown_closes_and_stops_discovery() {
        let mut applet = applet();
        click(&mut applet, Instant::now());
        let commands = applet.handle(AppletEvent::Teardown, &Empty);
        assert_eq!(commands, vec![Command::CloseMenu, Command::StopDiscovery]);
    }
}
