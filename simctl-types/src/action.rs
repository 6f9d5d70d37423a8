//! Action types for the control API.
//!
//! A `ControlAction` is the free-form pair that arrives from a scenario or
//! from a peer. `ControlCommand` is the closed set of actions an entity can
//! actually apply; parsing is where unrecognized names are caught.

use serde::{Deserialize, Serialize};

/// A single `(action, value)` instruction for a controllable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlAction {
    pub action: String,
    pub value: String,
}

impl ControlAction {
    pub fn new(action: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a `state` action.
    pub fn state(value: impl Into<String>) -> Self {
        Self::new(ControlCommand::STATE, value)
    }
}

/// Recognized control commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Set the entity's current state.
    State(String),
}

impl ControlCommand {
    pub const STATE: &'static str = "state";

    /// Parse a wire-level action into a command.
    pub fn parse(action: &ControlAction) -> Result<Self, UnknownAction> {
        match action.action.as_str() {
            Self::STATE => Ok(Self::State(action.value.clone())),
            other => Err(UnknownAction(other.to_string())),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::State(_) => CommandKind::State,
        }
    }
}

/// Discriminant of `ControlCommand`, used to describe what an entity accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    State,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::State => ControlCommand::STATE,
        }
    }
}

/// The set of commands an entity applies. Anything outside the set is
/// reported as an invalid action and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionSet {
    /// Accepts nothing.
    #[default]
    None,
    /// Accepts `state`.
    State,
}

impl ActionSet {
    pub fn contains(&self, kind: CommandKind) -> bool {
        match self {
            ActionSet::None => false,
            ActionSet::State => kind == CommandKind::State,
        }
    }

    /// Action names this set accepts, in declaration order.
    pub fn names(&self) -> Vec<String> {
        match self {
            ActionSet::None => Vec::new(),
            ActionSet::State => vec![CommandKind::State.as_str().to_string()],
        }
    }
}

/// An action name outside the command vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl std::fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}
