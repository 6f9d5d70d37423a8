#![allow(dead_code)]
//! Test harness utilities for simctl-net integration tests.

use std::sync::Arc;

use simctl_net::{LoopbackNetwork, LoopbackPeer, MessagesManager, Replicated};
use simctl_types::TrafficCone;

/// Route captured test logs through the harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One simulated process: a peer plus its replica of a cone.
pub struct Node {
    pub peer: Arc<LoopbackPeer>,
    pub cone: Replicated<TrafficCone>,
}

impl Node {
    pub fn join(net: &LoopbackNetwork, master: bool, uid: &str) -> Self {
        let peer = net.join(master);
        let manager: Arc<dyn MessagesManager> = peer.clone();
        let cone = Replicated::new(TrafficCone::new(uid), Some(manager));
        Self { peer, cone }
    }

    /// Apply everything waiting in the inbox. Returns how many messages were applied.
    pub fn pump(&mut self) -> usize {
        let messages = self.peer.poll_messages();
        let n = messages.len();
        for msg in messages {
            self.cone.receive_message(msg);
        }
        n
    }
}

/// A master and `clients` client nodes, all replicating the cone `uid`.
pub fn cluster(clients: usize, uid: &str) -> (LoopbackNetwork, Node, Vec<Node>) {
    init_logging();
    let net = LoopbackNetwork::new();
    let master = Node::join(&net, true, uid);
    let clients = (0..clients).map(|_| Node::join(&net, false, uid)).collect();
    (net, master, clients)
}
