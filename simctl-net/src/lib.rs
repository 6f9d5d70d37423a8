//! Replication layer for simctl controllable entities.
//!
//! This crate provides the byte-stack payload codec, the message envelope,
//! the `MessagesManager` seam to an external transport, and the
//! `Replicated` wrapper that mirrors master-side control to peers.

pub mod codec;
pub mod loopback;
pub mod manager;
pub mod protocol;
pub mod replicated;
pub mod stack;

pub use codec::{decode_actions, encode_actions};
pub use loopback::{LoopbackNetwork, LoopbackPeer, PeerId};
pub use manager::MessagesManager;
pub use protocol::{DeliveryKind, DistributedMessage};
pub use replicated::Replicated;
pub use stack::{BytesStack, StackError};
