//! The applet main loop.
//!
//! [`Runtime`] owns everything with side effects: the tray handle, service
//! discovery, the launcher and the config store. Tray and discovery callbacks
//! arrive as [`TrayEvent`]s on one channel, are translated into
//! [`AppletEvent`]s for the shell, and the resulting [`Command`]s are executed
//! here, on a single thread.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, channel};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use ksni::blocking::TrayMethods;

use crate::applet::{Applet, AppletEvent, Button, Command, ContextAction, MenuSource, Point, Size};
use crate::config::{Config, ConfigStore};
use crate::discovery::{DiscoveredService, ServiceDiscovery, ServiceList};
use crate::error::{AppletError, Result};
use crate::launcher::Launcher;
use crate::menu::{DISCOVERY_TOGGLE_ID, MenuAction, PopupMenu};
use crate::profile::{ProfileEntry, scan_profiles};
use crate::tray::state::lock;
use crate::tray::{KsniTray, TrayEvent, TrayState};

const TRAY_ID: &str = "remmina-applet";

/// Profiles read from disk and the discovery snapshot.
///
/// Shared with the tray so the menu can be rebuilt on the ksni thread.
struct Sources {
    profile_dir: PathBuf,
    services: ServiceList,
}

impl MenuSource for Sources {
    fn profiles(&self) -> Vec<ProfileEntry> {
        scan_profiles(&self.profile_dir)
    }

    fn discovered(&self) -> Vec<DiscoveredService> {
        self.services.snapshot()
    }
}

/// Owns the applet's side effects and runs its event loop.
pub struct Runtime {
    config: Config,
    store: ConfigStore,
    sources: Arc<Sources>,
    applet: Applet,
    discovery: ServiceDiscovery,
    launcher: Launcher,
    tray: Arc<Mutex<TrayState>>,
    handle: Option<ksni::blocking::Handle<KsniTray>>,
    events: Receiver<TrayEvent>,
}

impl Runtime {
    pub fn new(config: Config, store: ConfigStore) -> Self {
        let (sender, events) = channel();

        let discovery_tx = sender.clone();
        let discovery = ServiceDiscovery::new(config.discovery.clone(), move |change| {
            let _ = discovery_tx.send(TrayEvent::DiscoveryChanged(change));
        });
        let sources = Arc::new(Sources {
            profile_dir: config.paths.profile_dir(),
            services: discovery.list(),
        });

        let mut tray = TrayState::new(TRAY_ID.to_string());
        tray.icon_theme_path = config.paths.icon_theme_path.display().to_string();
        tray.preferences = config.preferences;
        let source: Arc<dyn MenuSource + Send + Sync> = sources.clone();
        tray.source = Some(source);
        tray.event_sender = Some(sender);

        Self {
            applet: Applet::new(config.preferences, &config.panel),
            launcher: Launcher::new(&config.paths.launcher),
            tray: Arc::new(Mutex::new(tray)),
            handle: None,
            sources,
            discovery,
            config,
            store,
            events,
        }
    }

    /// Spawns the tray and runs until Quit or until the tray shuts down.
    pub fn run(mut self) -> Result<()> {
        let tray = KsniTray {
            state: Arc::clone(&self.tray),
        };
        let handle = tray
            .spawn()
            .map_err(|e| AppletError::Tray(e.to_string()))?;
        self.handle = Some(handle);
        tracing::info!(profile_dir = %self.sources.profile_dir.display(), "applet started");

        // SNI hosts never report an allocation; start from the configured panel size.
        let size = self.config.panel.size;
        self.dispatch(AppletEvent::Resize(Size::new(size, size)));
        if self.applet.preferences().enable_discovery {
            self.execute(Command::StartDiscovery);
        }
        self.dispatch(AppletEvent::Refresh);

        while let Ok(event) = self.events.recv() {
            if self.on_tray_event(event, Instant::now()) {
                break;
            }
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.shutdown();
        }
        tracing::info!("applet stopped");
        Ok(())
    }

    /// Handles one channel message. Returns true once the applet is torn down.
    fn on_tray_event(&mut self, event: TrayEvent, at: Instant) -> bool {
        let Some(event) = to_applet_event(event, at) else {
            return false;
        };
        let done = event == AppletEvent::Teardown;
        self.dispatch(event);
        done
    }

    fn dispatch(&mut self, event: AppletEvent) {
        let commands = self.applet.handle(event, self.sources.as_ref());
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::SetIconSize(size) => {
                lock(&self.tray).icon_size = size;
                self.notify_tray();
            }
            Command::ShowMenu { menu, position } => {
                tracing::debug!(x = position.x, y = position.y, "popup requested");
                self.push_menu(&menu);
            }
            Command::UpdateMenu(menu) => self.push_menu(&menu),
            Command::CloseMenu => tracing::trace!("popup closed"),
            Command::Launch(request) => {
                tracing::info!(
                    mode = %request.mode,
                    program = %self.launcher.program().display(),
                    "launching"
                );
                if let Err(e) = self.launcher.launch(&request) {
                    tracing::error!(error = %e, "launch failed");
                }
            }
            Command::StartDiscovery => {
                if let Err(e) = self.discovery.start() {
                    tracing::warn!(error = %e, "service discovery unavailable");
                }
            }
            Command::StopDiscovery => self.discovery.stop(),
            Command::SavePreferences(preferences) => {
                self.config.preferences = preferences;
                lock(&self.tray).preferences = preferences;
                if let Err(e) = self.store.save(&self.config) {
                    tracing::warn!(error = %e, path = %self.store.path().display(), "failed to save preferences");
                }
            }
        }
    }

    fn push_menu(&self, menu: &PopupMenu) {
        lock(&self.tray).set_menu(menu);
        self.notify_tray();
    }

    /// Asks ksni to re-read the tray properties and menu.
    fn notify_tray(&self) {
        if let Some(handle) = &self.handle {
            let _ = handle.update(|_| {});
        }
    }
}

/// Maps a tray callback onto a shell event.
fn to_applet_event(event: TrayEvent, at: Instant) -> Option<AppletEvent> {
    let event = match event {
        // AboutToShow carries no position; the host places the menu.
        TrayEvent::MenuOpened => AppletEvent::Click {
            button: Button::Primary,
            anchor: Point::default(),
            at,
        },
        TrayEvent::SecondaryActivated { x, y } => AppletEvent::Click {
            button: Button::Middle,
            anchor: Point::new(x, y),
            at,
        },
        TrayEvent::MenuActivated(action) => match action {
            MenuAction::Open(item) => AppletEvent::ItemActivated {
                item,
                button: Button::Primary,
            },
            MenuAction::OpenMain => AppletEvent::Context(ContextAction::OpenMain),
            MenuAction::Preferences => AppletEvent::Context(ContextAction::Preferences),
            MenuAction::About => AppletEvent::Context(ContextAction::About),
            MenuAction::Quit => AppletEvent::Teardown,
        },
        TrayEvent::CheckmarkToggled(id, checked) if id == DISCOVERY_TOGGLE_ID => {
            AppletEvent::DiscoveryToggled(checked)
        }
        TrayEvent::CheckmarkToggled(id, _) => {
            tracing::warn!(%id, "unknown checkmark");
            return None;
        }
        TrayEvent::DiscoveryChanged(change) => {
            tracing::debug!(%change, "refreshing menu");
            AppletEvent::Refresh
        }
        TrayEvent::Shutdown => AppletEvent::Teardown,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applet::Phase;
    use crate::discovery::DiscoveryEvent;
    use crate::menu::{MenuItem, MenuNode};
    use crate::tray::state::tests::{labels, write_profile};

    fn runtime_in(dir: &std::path::Path) -> Runtime {
        let mut config = Config::default();
        config.paths.profile_dir = Some(dir.to_path_buf());
        config.paths.icon_theme_path = dir.join("icons");
        Runtime::new(config, ConfigStore::new(dir.join("applet.toml")))
    }

    #[test]
    fn menu_open_is_primary_click() {
        let at = Instant::now();
        assert_eq!(
            to_applet_event(TrayEvent::MenuOpened, at),
            Some(AppletEvent::Click {
                button: Button::Primary,
                anchor: Point::default(),
                at,
            })
        );
        assert_eq!(
            to_applet_event(TrayEvent::SecondaryActivated { x: 40, y: 1060 }, at),
            Some(AppletEvent::Click {
                button: Button::Middle,
                anchor: Point::new(40, 1060),
                at,
            })
        );
    }

    #[test]
    fn menu_actions_translate() {
        let at = Instant::now();
        let open = to_applet_event(
            TrayEvent::MenuActivated(MenuAction::Open(MenuItem::QuickConnect)),
            at,
        );
        assert_eq!(
            open,
            Some(AppletEvent::ItemActivated {
                item: MenuItem::QuickConnect,
                button: Button::Primary,
            })
        );
        assert_eq!(
            to_applet_event(TrayEvent::MenuActivated(MenuAction::About), at),
            Some(AppletEvent::Context(ContextAction::About))
        );
        assert_eq!(
            to_applet_event(TrayEvent::MenuActivated(MenuAction::Quit), at),
            Some(AppletEvent::Teardown)
        );
        assert_eq!(
            to_applet_event(TrayEvent::Shutdown, at),
            Some(AppletEvent::Teardown)
        );
    }

    #[test]
    fn checkmarks_and_discovery() {
        let at = Instant::now();
        assert_eq!(
            to_applet_event(
                TrayEvent::CheckmarkToggled(DISCOVERY_TOGGLE_ID.into(), true),
                at
            ),
            Some(AppletEvent::DiscoveryToggled(true))
        );
        assert_eq!(
            to_applet_event(TrayEvent::CheckmarkToggled("other".into(), true), at),
            None
        );
        assert_eq!(
            to_applet_event(TrayEvent::DiscoveryChanged(DiscoveryEvent::Cleared), at),
            Some(AppletEvent::Refresh)
        );
    }

    #[test]
    fn new_wires_tray_state() {
        let tmp = tempfile::tempdir().unwrap();
        let runtime = runtime_in(tmp.path());
        let tray = lock(&runtime.tray);
        assert!(tray.source.is_some());
        assert!(tray.event_sender.is_some());
        assert_eq!(
            tray.icon_theme_path,
            tmp.path().join("icons").display().to_string()
        );
    }

    #[test]
    fn menu_opened_runs_click_path_with_fresh_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runtime = runtime_in(tmp.path());
        runtime.dispatch(AppletEvent::Refresh);
        assert_eq!(labels(&lock(&runtime.tray).menu)[0], "Quick Connect");

        write_profile(tmp.path(), "a.remmina", "lab");
        let t0 = Instant::now();
        assert!(!runtime.on_tray_event(TrayEvent::MenuOpened, t0));

        assert_eq!(runtime.applet.state().phase(), Phase::MenuOpen);
        assert_eq!(labels(&lock(&runtime.tray).menu)[0], "lab");
    }

    #[test]
    fn discovery_toggle_updates_tray_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runtime = runtime_in(tmp.path());
        runtime.dispatch(AppletEvent::Refresh);

        // Turning discovery off never starts a daemon.
        runtime.on_tray_event(
            TrayEvent::CheckmarkToggled(DISCOVERY_TOGGLE_ID.into(), false),
            Instant::now(),
        );
        assert!(!lock(&runtime.tray).preferences.enable_discovery);
        assert!(!runtime.discovery.started());
        assert!(runtime.store.path().exists());

        let mut tray = lock(&runtime.tray);
        tray.rebuild_menu();
        assert!(tray.menu.iter().any(|n| matches!(
            n,
            MenuNode::Checkmark { checked: false, .. }
        )));
    }

    #[test]
    fn quit_ends_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runtime = runtime_in(tmp.path());
        assert!(runtime.on_tray_event(
            TrayEvent::MenuActivated(MenuAction::Quit),
            Instant::now()
        ));
    }
}
