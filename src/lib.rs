//! # remmina-applet
//!
//! A panel applet for Linux desktops that lists saved Remmina connection
//! profiles and remote desktops found on the local network, and starts
//! `remmina` to open them. The icon is published through the
//! StatusNotifierItem (SNI) specification via the
//! [ksni](https://crates.io/crates/ksni) library.
//!
//! ## Overview
//!
//! - [`profile`] scans `~/.remmina` for `*.remmina` files.
//! - [`discovery`] browses mDNS for VNC servers.
//! - [`menu`] sorts and groups both into the popup menu.
//! - [`applet`] is the event handler: it turns clicks, resizes and menu
//!   activations into [`applet::Command`]s without touching the desktop.
//! - [`tray`] and [`runtime`] connect the handler to the SNI host, the
//!   launcher and the config file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use remmina_applet::config::ConfigStore;
//! use remmina_applet::runtime::Runtime;
//!
//! let store = ConfigStore::default_location();
//! let config = store.load()?;
//! Runtime::new(config, store).run()?;
//! # Ok::<(), remmina_applet::AppletError>(())
//! ```

// Module declarations
pub mod applet;
pub mod config;
pub mod discovery;
pub mod error;
pub mod launcher;
pub mod menu;
pub mod profile;
pub mod runtime;
pub mod tray;

// Public re-exports
pub use applet::{Applet, AppletEvent, Command, MenuSource};
pub use config::{Config, ConfigStore, Preferences};
pub use error::{AppletError, Result};
pub use menu::{MenuItem, PopupMenu, build_popup};
pub use tray::{KsniTray, TrayEvent, TrayState};
