//! Discovery value types: services, change events and address formatting.

use std::fmt;

/// Group label under which discovered hosts are listed.
pub const DISCOVERED_GROUP: &str = "Discovered";

/// A remote desktop announced on the local network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredService {
    /// Connection string, `host:port`.
    pub name: String,
    /// Protocol handed to the launcher.
    pub protocol: String,
}

impl DiscoveredService {
    pub fn group(&self) -> &'static str {
        DISCOVERED_GROUP
    }
}

/// A change in the set of discovered services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    Added(String),
    Removed(String),
    Cleared,
}

impl fmt::Display for DiscoveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryEvent::Added(name) => write!(f, "added {name}"),
            DiscoveryEvent::Removed(name) => write!(f, "removed {name}"),
            DiscoveryEvent::Cleared => write!(f, "cleared"),
        }
    }
}

/// Formats the address a discovered host is reached at.
///
/// mDNS host names carry a trailing dot, which the launcher does not accept.
/// IPv6 literals are bracketed so the port stays unambiguous.
pub fn connection_string(host: &str, port: u16) -> String {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_dot_removed() {
        assert_eq!(connection_string("desk.local.", 5900), "desk.local:5900");
        assert_eq!(connection_string("desk.local", 5901), "desk.local:5901");
    }

    #[test]
    fn ipv6_bracketed() {
        assert_eq!(connection_string("fe80::1", 5900), "[fe80::1]:5900");
    }

    #[test]
    fn event_display() {
        assert_eq!(DiscoveryEvent::Added("a:1".into()).to_string(), "added a:1");
        assert_eq!(DiscoveryEvent::Removed("a:1".into()).to_string(), "removed a:1");
        assert_eq!(DiscoveryEvent::Cleared.to_string(), "cleared");
    }
}
