//! Menu model and popup construction.
//!
//! [`MenuItem`] is the row model, [`builder`] sorts and groups rows into a
//! [`PopupMenu`], and [`MenuNode`] is the rendered tree handed to the tray.

pub mod builder;
pub mod item;
pub mod node;

pub use builder::{
    MenuMetrics, MenuOptions, PopupEntry, PopupMenu, build_popup, context_section, group_items,
    sort_items,
};
pub use item::{ItemType, MenuItem, QUICK_CONNECT_LABEL};
pub use node::{DISCOVERY_TOGGLE_ID, MenuAction, MenuNode};
