//! Applet shell: state, events, and the commands it emits.
//!
//! The shell is toolkit-agnostic. A host (the tray bridge in this crate)
//! turns its callbacks into [`AppletEvent`]s, feeds them to
//! [`Applet::handle`], and executes the returned [`Command`]s.

pub mod command;
pub mod event;
pub mod geometry;
pub mod shell;
pub mod state;

pub use command::Command;
pub use event::{AppletEvent, Button, ContextAction};
pub use geometry::{
    MIN_ALLOCATION, Orientation, Point, Size, icon_size_for, panel_extent, popup_position,
};
pub use shell::{Applet, DOUBLE_INTERACTION_THRESHOLD, MenuSource};
pub use state::{AppletState, OpenPopup, Phase};
