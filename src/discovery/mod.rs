//! Local-network discovery of remote desktops.

pub mod browser;
pub mod types;

pub use browser::{ServiceDiscovery, ServiceList};
pub use types::{DISCOVERED_GROUP, DiscoveredService, DiscoveryEvent, connection_string};
