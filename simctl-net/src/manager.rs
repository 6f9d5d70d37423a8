//! Seam to the external messaging layer.

use crate::protocol::DistributedMessage;

/// Transport owned outside this crate: connection management, reliability,
/// and master arbitration all live behind this trait.
///
/// Methods take `&self` so one manager can be shared by every replicated
/// object in a process.
pub trait MessagesManager {
    /// Whether this process is the authoritative master.
    fn is_master(&self) -> bool;

    /// Start routing messages addressed to `key` to this process's object.
    fn register_object(&self, key: &str);

    fn unregister_object(&self, key: &str);

    /// Send to every other peer.
    fn broadcast_message(&self, message: DistributedMessage);
}
