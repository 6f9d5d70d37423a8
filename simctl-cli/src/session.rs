//! Master plus loopback clients, each holding its own registry.

use std::fmt;
use std::sync::Arc;

use simctl_core::api::{run_scenario, Scenario};
use simctl_core::config::Config;
use simctl_core::registry::ControllableRegistry;
use simctl_net::{LoopbackNetwork, LoopbackPeer};
use simctl_types::Controllable;

struct Client {
    peer: Arc<LoopbackPeer>,
    registry: ControllableRegistry,
}

pub struct Session {
    // Keeps the hub alive for the whole run.
    _net: LoopbackNetwork,
    master: ControllableRegistry,
    clients: Vec<Client>,
}

impl Session {
    /// Spawn every cone the scenario mentions on the master and on `peers`
    /// clients.
    pub fn new(config: &Config, scenario: &Scenario, peers: usize) -> Self {
        let net = LoopbackNetwork::new();
        let mut master = ControllableRegistry::with_manager(net.join(true));
        let mut clients: Vec<Client> = (0..peers)
            .map(|_| {
                let peer = net.join(false);
                Client {
                    registry: ControllableRegistry::with_manager(peer.clone()),
                    peer,
                }
            })
            .collect();

        for uid in scenario.uids() {
            spawn_cone(&mut master, config, uid);
            for client in &mut clients {
                spawn_cone(&mut client.registry, config, uid);
            }
        }

        Self {
            _net: net,
            master,
            clients,
        }
    }

    /// Run the scenario on the master, then let every client drain its inbox.
    pub fn run(&mut self, scenario: &Scenario) -> usize {
        let applied = run_scenario(&mut self.master, scenario);
        for client in &mut self.clients {
            for msg in client.peer.poll_messages() {
                if let Err(e) = client.registry.deliver(msg) {
                    log::warn!("Client {:?}: {}", client.peer.id(), e);
                }
            }
        }
        applied
    }

    pub fn report(&self) -> Report {
        let rows = self
            .master
            .uids()
            .map(|uid| {
                let state = |registry: &ControllableRegistry| {
                    registry
                        .get(uid.as_str())
                        .map(|e| e.current_state().to_string())
                        .unwrap_or_default()
                };
                ReportRow {
                    uid: uid.to_string(),
                    master: state(&self.master),
                    clients: self.clients.iter().map(|c| state(&c.registry)).collect(),
                }
            })
            .collect();
        Report { rows }
    }
}

fn spawn_cone(registry: &mut ControllableRegistry, config: &Config, uid: &str) {
    if let Err(e) = registry.spawn(Box::new(config.cone(uid))) {
        log::warn!("{}", e);
    }
}

pub struct ReportRow {
    pub uid: String,
    pub master: String,
    pub clients: Vec<String>,
}

/// Final state of every cone on every peer.
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn converged(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.clients.iter().all(|c| *c == row.master))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "{:<12} master={:?}", row.uid, row.master)?;
            for (i, c) in row.clients.iter().enumerate() {
                write!(f, " client{}={:?}", i, c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
