//! # simctl-types
//!
//! Shared type definitions for simctl controllable entities.
//! This crate contains the action vocabulary, the `Controllable` trait and
//! the entities themselves. It is used by simctl-core and simctl-net.

pub mod action;
pub mod cone;
pub mod controllable;
pub mod reduce;

pub use action::*;
pub use cone::TrafficCone;
pub use controllable::*;

/// Identity string of a controllable entity.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Uid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        &self.0
    }
}
