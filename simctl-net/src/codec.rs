//! Control action lists on a [`BytesStack`].
//!
//! Wire layout, bottom to top: for each pair from last to first, `value`
//! then `action`. Popping until the stack is empty therefore yields
//! `action, value` for each pair in the order the sender dispatched them.

use simctl_types::ControlAction;

use crate::stack::{BytesStack, StackError};

/// Push `actions` onto a fresh stack.
pub fn encode_actions(actions: &[ControlAction]) -> BytesStack {
    let mut stack = BytesStack::new();
    for action in actions.iter().rev() {
        stack.push_string(&action.value);
        stack.push_string(&action.action);
    }
    stack
}

/// Pop every pair off `stack`.
pub fn decode_actions(mut stack: BytesStack) -> Result<Vec<ControlAction>, StackError> {
    let mut actions = Vec::new();
    while !stack.is_empty() {
        let action = stack.pop_string()?;
        let value = stack.pop_string()?;
        actions.push(ControlAction { action, value });
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_preserves_send_order() {
        let actions = vec![
            ControlAction::state("a"),
            ControlAction::new("blink", "on"),
            ControlAction::state("b"),
        ];
        let decoded = decode_actions(encode_actions(&actions)).unwrap();
        assert_eq!(decoded, actions);
    }

    #[test]
    fn empty_list_is_empty_stack() {
        let stack = encode_actions(&[]);
        assert!(stack.is_empty());
        assert!(decode_actions(stack).unwrap().is_empty());
    }

    #[test]
    fn top_of_stack_is_first_action() {
        let mut stack = encode_actions(&[ControlAction::state("x"), ControlAction::state("y")]);
        assert_eq!(stack.pop_string().unwrap(), "state");
        assert_eq!(stack.pop_string().unwrap(), "x");
    }

    #[test]
    fn dangling_action_is_an_error() {
        let mut stack = BytesStack::new();
        stack.push_string("state");
        assert!(matches!(decode_actions(stack), Err(StackError::Underflow { .. })));
    }
}
