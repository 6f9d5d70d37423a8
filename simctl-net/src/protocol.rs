//! Message envelope exchanged between simulation peers.

use serde::{Deserialize, Serialize};

use crate::stack::BytesStack;

/// Delivery class requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeliveryKind {
    /// Exactly once, in send order.
    #[default]
    ReliableOrdered,
    /// Exactly once, any order.
    ReliableUnordered,
    /// Best effort.
    Unreliable,
}

/// A keyed message routed to the object registered under `address_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributedMessage {
    pub address_key: String,
    pub content: BytesStack,
    pub kind: DeliveryKind,
}

impl DistributedMessage {
    pub fn new(address_key: impl Into<String>, content: BytesStack, kind: DeliveryKind) -> Self {
        Self {
            address_key: address_key.into(),
            content,
            kind,
        }
    }

    /// Encode the envelope to bytes for a transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (msg, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(msg)
    }
}
