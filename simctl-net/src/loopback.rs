//! In-process transport for tests and local demos.
//!
//! Every peer gets an mpsc inbox. Broadcasts are encoded to bytes and pushed
//! to every other peer in send order, which gives reliable-ordered delivery
//! for free within one process.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};

use crate::manager::MessagesManager;
use crate::protocol::DistributedMessage;

/// Identifier of a peer on a [`LoopbackNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

#[derive(Default)]
struct Hub {
    peers: HashMap<PeerId, Sender<Vec<u8>>>,
    next_peer_id: u64,
    master: Option<PeerId>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared hub that peers join.
#[derive(Clone, Default)]
pub struct LoopbackNetwork {
    hub: Arc<Mutex<Hub>>,
}

impl LoopbackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the network. Only the first peer asking for mastership gets it;
    /// later requests join as clients.
    pub fn join(&self, want_master: bool) -> Arc<LoopbackPeer> {
        let (tx, rx) = mpsc::channel();
        let mut hub = lock(&self.hub);

        let id = PeerId(hub.next_peer_id);
        hub.next_peer_id += 1;
        hub.peers.insert(id, tx);

        let master = if want_master && hub.master.is_none() {
            hub.master = Some(id);
            true
        } else {
            if want_master {
                warn!("Peer {:?} asked for mastership but {:?} holds it", id, hub.master);
            }
            false
        };

        info!("Peer {:?} joined loopback network, master={}", id, master);

        Arc::new(LoopbackPeer {
            id,
            master,
            hub: Arc::clone(&self.hub),
            inbox: rx,
            registered: Mutex::new(HashSet::new()),
            sent: AtomicUsize::new(0),
        })
    }

    /// Number of connected peers.
    pub fn peer_count(&self) -> usize {
        lock(&self.hub).peers.len()
    }
}

/// One process's view of the network.
pub struct LoopbackPeer {
    id: PeerId,
    master: bool,
    hub: Arc<Mutex<Hub>>,
    inbox: Receiver<Vec<u8>>,
    registered: Mutex<HashSet<String>>,
    sent: AtomicUsize,
}

impl LoopbackPeer {
    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Number of broadcasts this peer has sent.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn is_registered(&self, key: &str) -> bool {
        lock(&self.registered).contains(key)
    }

    /// Drain the inbox, returning messages addressed to registered objects.
    pub fn poll_messages(&self) -> Vec<DistributedMessage> {
        let mut messages = Vec::new();
        loop {
            match self.inbox.try_recv() {
                Ok(bytes) => match DistributedMessage::from_bytes(&bytes) {
                    Ok(msg) => {
                        if self.is_registered(&msg.address_key) {
                            messages.push(msg);
                        } else {
                            warn!(
                                "Peer {:?} dropping message for unregistered key '{}'",
                                self.id, msg.address_key
                            );
                        }
                    }
                    Err(e) => warn!("Peer {:?} failed to decode message: {}", self.id, e),
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}

impl MessagesManager for LoopbackPeer {
    fn is_master(&self) -> bool {
        self.master
    }

    fn register_object(&self, key: &str) {
        if !lock(&self.registered).insert(key.to_string()) {
            warn!("Peer {:?}: '{}' registered twice", self.id, key);
        }
    }

    fn unregister_object(&self, key: &str) {
        lock(&self.registered).remove(key);
    }

    fn broadcast_message(&self, message: DistributedMessage) {
        let bytes = match message.to_bytes() {
            Ok(b) => b,
            Err(e) => {
                warn!("Peer {:?} failed to encode message: {}", self.id, e);
                return;
            }
        };

        let mut hub = lock(&self.hub);
        let mut disconnected = Vec::new();
        for (&id, tx) in &hub.peers {
            if id == self.id {
                continue;
            }
            if tx.send(bytes.clone()).is_err() {
                disconnected.push(id);
            }
        }
        for id in disconnected {
            warn!("Peer {:?} is gone, removing", id);
            hub.peers.remove(&id);
        }

        self.sent.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Peer {:?} broadcast '{}' ({} bytes)",
            self.id,
            message.address_key,
            bytes.len()
        );
    }
}

impl Drop for LoopbackPeer {
    fn drop(&mut self) {
        let mut hub = lock(&self.hub);
        hub.peers.remove(&self.id);
        if hub.master == Some(self.id) {
            hub.master = None;
        }
        info!("Peer {:?} left loopback network", self.id);
    }
}
