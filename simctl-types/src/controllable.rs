//! Controllable abstraction shared by local and replicated entities.

use serde::{Deserialize, Serialize};

use crate::{ControlAction, Uid};

/// Trait for entities driven by the control API.
///
/// `control` is total: unrecognized actions are reported and skipped, and
/// nothing is returned to the caller.
///
/// There is no separate spawned flag: a value is spawned for as long as it
/// exists, so construction is the spawn hook and `Drop` the despawn hook.
/// The entity's GUID is its [`uid`](Controllable::uid).
pub trait Controllable {
    fn uid(&self) -> &Uid;

    /// Category tag, e.g. `"cone"`.
    fn control_type(&self) -> &str;

    fn valid_states(&self) -> &[String];

    fn valid_actions(&self) -> Vec<String>;

    fn default_control_policy(&self) -> &ControlPolicy;

    fn current_control_policy(&self) -> &ControlPolicy;

    /// Current state string; empty while idle.
    fn current_state(&self) -> &str;

    /// Apply actions in order.
    fn control(&mut self, actions: &[ControlAction]);
}

impl<C: Controllable + ?Sized> Controllable for Box<C> {
    fn uid(&self) -> &Uid {
        (**self).uid()
    }
    fn control_type(&self) -> &str {
        (**self).control_type()
    }
    fn valid_states(&self) -> &[String] {
        (**self).valid_states()
    }
    fn valid_actions(&self) -> Vec<String> {
        (**self).valid_actions()
    }
    fn default_control_policy(&self) -> &ControlPolicy {
        (**self).default_control_policy()
    }
    fn current_control_policy(&self) -> &ControlPolicy {
        (**self).current_control_policy()
    }
    fn current_state(&self) -> &str {
        (**self).current_state()
    }
    fn control(&mut self, actions: &[ControlAction]) {
        (**self).control(actions)
    }
}

/// Control policy: either a named policy or a literal list of actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlPolicy {
    Named(String),
    Actions(Vec<ControlAction>),
}

impl Default for ControlPolicy {
    fn default() -> Self {
        ControlPolicy::Named(String::new())
    }
}

/// State of an entity. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    HasState(String),
}

impl ControlState {
    pub fn as_str(&self) -> &str {
        match self {
            ControlState::Idle => "",
            ControlState::HasState(s) => s,
        }
    }
}

/// Log level used when an entity rejects an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Warn,
    Error,
}

impl DiagnosticLevel {
    /// Report an action the entity does not accept.
    pub fn invalid_action(&self, action: &str, control_type: &str) {
        match self {
            DiagnosticLevel::Warn => {
                log::warn!("'{}' is an invalid action for '{}'", action, control_type)
            }
            DiagnosticLevel::Error => {
                log::error!("'{}' is an invalid action for '{}'", action, control_type)
            }
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "warn" | "warning" => Some(DiagnosticLevel::Warn),
            "error" => Some(DiagnosticLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_reads_as_empty() {
        assert_eq!(ControlState::default().as_str(), "");
        assert_eq!(ControlState::HasState("up".into()).as_str(), "up");
    }

    #[test]
    fn policy_json_accepts_both_forms() {
        let named: ControlPolicy = serde_json::from_str(r#""trigger=100""#).unwrap();
        assert_eq!(named, ControlPolicy::Named("trigger=100".into()));

        let list: ControlPolicy =
            serde_json::from_str(r#"[{"action":"state","value":"down"}]"#).unwrap();
        assert_eq!(list, ControlPolicy::Actions(vec![ControlAction::state("down")]));
    }

    #[test]
    fn diagnostic_level_parse() {
        assert_eq!(DiagnosticLevel::parse("warn"), Some(DiagnosticLevel::Warn));
        assert_eq!(DiagnosticLevel::parse("Warning"), Some(DiagnosticLevel::Warn));
        assert_eq!(DiagnosticLevel::parse("ERROR"), Some(DiagnosticLevel::Error));
        assert_eq!(DiagnosticLevel::parse(""), None);
    }
}
