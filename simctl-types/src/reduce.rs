//! Pure state-mutation reducers for controllable entities.
//!
//! These functions are the single source of truth for action → state
//! mutations. Local entities and replicated entities both end up here.
//! Reducers only touch `ControlState`; they never send messages.

use crate::{ActionSet, ControlAction, ControlCommand, ControlState, DiagnosticLevel};

/// Apply one command to the given state.
pub fn reduce_command(command: &ControlCommand, state: &mut ControlState) {
    match command {
        ControlCommand::State(value) => {
            *state = ControlState::HasState(value.clone());
        }
    }
}

/// Apply a list of actions in order.
///
/// Actions that do not parse, or that parse to a command outside `accepts`,
/// are reported at `level` and skipped. Returns the number of actions applied.
pub fn reduce_actions(
    actions: &[ControlAction],
    accepts: ActionSet,
    level: DiagnosticLevel,
    control_type: &str,
    state: &mut ControlState,
) -> usize {
    let mut applied = 0;
    for action in actions {
        match ControlCommand::parse(action) {
            Ok(command) if accepts.contains(command.kind()) => {
                reduce_command(&command, state);
                applied += 1;
            }
            _ => level.invalid_action(&action.action, control_type),
        }
    }
    applied
}
