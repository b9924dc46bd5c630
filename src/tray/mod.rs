//! StatusNotifierItem host bridge.
//!
//! This module contains the tray state, the events it posts to the main
//! loop, and the bridge to the ksni library.

pub mod event;
pub mod ksni_impl;
pub mod state;

pub use event::TrayEvent;
pub use ksni_impl::KsniTray;
pub use state::TrayState;
