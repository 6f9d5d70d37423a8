//! Traffic cone: the reference controllable entity.

use log::{debug, info};

use crate::reduce::reduce_actions;
use crate::{
    ActionSet, ControlAction, ControlPolicy, ControlState, Controllable, DiagnosticLevel, Uid,
};

pub const CONE_CONTROL_TYPE: &str = "cone";

/// A traffic cone placed in the world.
///
/// Construction plays the role of spawning: the current policy starts at
/// the default policy and the state starts idle. Dropping the cone despawns
/// it.
#[derive(Debug)]
pub struct TrafficCone {
    uid: Uid,
    control_type: String,
    valid_states: Vec<String>,
    accepts: ActionSet,
    diagnostics: DiagnosticLevel,
    default_control_policy: ControlPolicy,
    current_control_policy: ControlPolicy,
    state: ControlState,
}

impl TrafficCone {
    /// Cone that accepts `state` and warns on anything else.
    pub fn new(uid: impl Into<Uid>) -> Self {
        Self::builder(uid).build()
    }

    /// Cone that accepts no actions; every action is reported as an error.
    pub fn inert(uid: impl Into<Uid>) -> Self {
        Self::builder(uid).accepts(ActionSet::None).build()
    }

    pub fn builder(uid: impl Into<Uid>) -> TrafficConeBuilder {
        TrafficConeBuilder {
            uid: uid.into(),
            control_type: CONE_CONTROL_TYPE.to_string(),
            valid_states: Vec::new(),
            accepts: ActionSet::State,
            diagnostics: None,
            default_control_policy: ControlPolicy::default(),
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn accepts(&self) -> ActionSet {
        self.accepts
    }

    pub fn diagnostics(&self) -> DiagnosticLevel {
        self.diagnostics
    }
}

/// Builder for [`TrafficCone`].
pub struct TrafficConeBuilder {
    uid: Uid,
    control_type: String,
    valid_states: Vec<String>,
    accepts: ActionSet,
    diagnostics: Option<DiagnosticLevel>,
    default_control_policy: ControlPolicy,
}

impl TrafficConeBuilder {
    pub fn control_type(mut self, control_type: impl Into<String>) -> Self {
        self.control_type = control_type.into();
        self
    }

    pub fn valid_states(mut self, states: Vec<String>) -> Self {
        self.valid_states = states;
        self
    }

    pub fn accepts(mut self, accepts: ActionSet) -> Self {
        self.accepts = accepts;
        self
    }

    /// Override the level used for invalid actions. Without an override an
    /// inert cone reports errors and a state cone reports warnings.
    pub fn diagnostics(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics = Some(level);
        self
    }

    pub fn default_control_policy(mut self, policy: ControlPolicy) -> Self {
        self.default_control_policy = policy;
        self
    }

    pub fn build(self) -> TrafficCone {
        let diagnostics = self.diagnostics.unwrap_or(match self.accepts {
            ActionSet::None => DiagnosticLevel::Error,
            ActionSet::State => DiagnosticLevel::Warn,
        });
        info!("Spawned {} '{}'", self.control_type, self.uid);
        TrafficCone {
            uid: self.uid,
            control_type: self.control_type,
            valid_states: self.valid_states,
            accepts: self.accepts,
            diagnostics,
            current_control_policy: self.default_control_policy.clone(),
            default_control_policy: self.default_control_policy,
            state: ControlState::Idle,
        }
    }
}

impl Controllable for TrafficCone {
    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn control_type(&self) -> &str {
        &self.control_type
    }

    fn valid_states(&self) -> &[String] {
        &self.valid_states
    }

    fn valid_actions(&self) -> Vec<String> {
        self.accepts.names()
    }

    fn default_control_policy(&self) -> &ControlPolicy {
        &self.default_control_policy
    }

    fn current_control_policy(&self) -> &ControlPolicy {
        &self.current_control_policy
    }

    fn current_state(&self) -> &str {
        self.state.as_str()
    }

    fn control(&mut self, actions: &[ControlAction]) {
        let applied = reduce_actions(
            actions,
            self.accepts,
            self.diagnostics,
            &self.control_type,
            &mut self.state,
        );
        debug!(
            "{} '{}' applied {}/{} actions, state={:?}",
            self.control_type,
            self.uid,
            applied,
            actions.len(),
            self.state.as_str()
        );
    }
}

impl Drop for TrafficCone {
    fn drop(&mut self) {
        // Stand-in for the host's unused-asset sweep.
        debug!("Despawned {} '{}', releasing unused assets", self.control_type, self.uid);
    }
}
