//! mDNS browser for remote desktops.
//!
//! [`ServiceDiscovery`] owns the mDNS daemon and a browse thread. The set of
//! services it has seen is shared through [`ServiceList`], which other
//! threads can read without going through the owner.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use mdns_sd::{ServiceDaemon, ServiceEvent};

use crate::config::DiscoverySettings;
use crate::discovery::types::{DiscoveredService, DiscoveryEvent, connection_string};
use crate::error::{AppletError, Result};

type ServiceMap = Arc<RwLock<BTreeMap<String, String>>>;

/// Read-only view of the discovered services, cheap to clone across threads.
#[derive(Clone)]
pub struct ServiceList {
    services: ServiceMap,
    protocol: String,
}

impl ServiceList {
    /// Returns the currently known services ordered by mDNS name.
    pub fn snapshot(&self) -> Vec<DiscoveredService> {
        self.services
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(|name| DiscoveredService {
                name: name.clone(),
                protocol: self.protocol.clone(),
            })
            .collect()
    }
}

type Notify = Arc<dyn Fn(DiscoveryEvent) + Send + Sync>;

/// Browses the local network for remote desktops via mDNS/DNS-SD.
///
/// Services are keyed by their mDNS full name and map to a connection
/// string. Every change is reported through the notify callback, which
/// runs on the browse thread; callers marshal it onto their own loop.
pub struct ServiceDiscovery {
    settings: DiscoverySettings,
    services: ServiceMap,
    notify: Notify,
    daemon: Option<ServiceDaemon>,
    worker: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

impl ServiceDiscovery {
    pub fn new(
        settings: DiscoverySettings,
        notify: impl Fn(DiscoveryEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            services: Arc::new(RwLock::new(BTreeMap::new())),
            notify: Arc::new(notify),
            daemon: None,
            worker: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn started(&self) -> bool {
        self.daemon.is_some()
    }

    /// Starts browsing. Does nothing if already started.
    pub fn start(&mut self) -> Result<()> {
        if self.started() {
            return Ok(());
        }

        let daemon = ServiceDaemon::new()
            .map_err(|e| AppletError::Discovery(format!("failed to create mDNS daemon: {e}")))?;

        let receiver = match daemon.browse(&self.settings.service_type) {
            Ok(rx) => rx,
            Err(e) => {
                let _ = daemon.shutdown();
                return Err(AppletError::Discovery(format!("failed to browse mDNS: {e}")));
            }
        };

        self.stop_flag.store(false, Ordering::Relaxed);
        let services = Arc::clone(&self.services);
        let notify = Arc::clone(&self.notify);
        let stop_flag = Arc::clone(&self.stop_flag);

        let spawned = std::thread::Builder::new()
            .name("mdns-browse".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match receiver.recv_timeout(Duration::from_millis(500)) {
                        Ok(event) if ends_browse(&event) => break,
                        Ok(event) => {
                            if let Some(change) = apply_event(&services, &event) {
                                tracing::debug!(%change, "discovered services changed");
                                notify(change);
                            }
                        }
                        Err(_) if receiver.is_disconnected() => break,
                        Err(_) => {}
                    }
                }
            });

        let worker = match spawned {
            Ok(worker) => worker,
            Err(e) => {
                let _ = daemon.shutdown();
                return Err(e.into());
            }
        };

        tracing::info!(service_type = %self.settings.service_type, "service discovery started");
        self.daemon = Some(daemon);
        self.worker = Some(worker);
        Ok(())
    }

    /// Stops browsing and forgets every discovered service.
    pub fn stop(&mut self) {
        let Some(daemon) = self.daemon.take() else {
            return;
        };

        self.stop_flag.store(true, Ordering::Relaxed);
        if let Err(e) = daemon.stop_browse(&self.settings.service_type) {
            tracing::debug!(error = %e, "failed to stop mDNS browse");
        }
        if let Err(e) = daemon.shutdown() {
            tracing::debug!(error = %e, "failed to shut down mDNS daemon");
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("mDNS browse thread panicked");
            }
        }

        let had_services = {
            let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
            let had = !services.is_empty();
            services.clear();
            had
        };
        if had_services {
            (self.notify)(DiscoveryEvent::Cleared);
        }

        tracing::info!("service discovery stopped");
    }

    /// A handle on the service set that outlives start/stop cycles.
    pub fn list(&self) -> ServiceList {
        ServiceList {
            services: Arc::clone(&self.services),
            protocol: self.settings.protocol.clone(),
        }
    }

    /// Returns the currently known services ordered by mDNS name.
    pub fn snapshot(&self) -> Vec<DiscoveredService> {
        self.list().snapshot()
    }
}

impl Drop for ServiceDiscovery {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `stop_browse` answers with SearchStopped; nothing follows it.
fn ends_browse(event: &ServiceEvent) -> bool {
    matches!(event, ServiceEvent::SearchStopped(_))
}

fn apply_event(services: &ServiceMap, event: &ServiceEvent) -> Option<DiscoveryEvent> {
    let mut services = services.write().unwrap_or_else(|e| e.into_inner());
    match event {
        ServiceEvent::ServiceResolved(info) => record_resolved(
            &mut services,
            info.get_fullname(),
            info.get_hostname(),
            info.get_port(),
        ),
        ServiceEvent::ServiceRemoved(_, fullname) => record_removed(&mut services, fullname),
        _ => None,
    }
}

fn record_resolved(
    services: &mut BTreeMap<String, String>,
    fullname: &str,
    host: &str,
    port: u16,
) -> Option<DiscoveryEvent> {
    let address = connection_string(host, port);
    match services.insert(fullname.to_string(), address.clone()) {
        Some(previous) if previous == address => None,
        _ => Some(DiscoveryEvent::Added(address)),
    }
}

fn record_removed(
    services: &mut BTreeMap<String, String>,
    fullname: &str,
) -> Option<DiscoveryEvent> {
    services.remove(fullname).map(DiscoveryEvent::Removed)
}
