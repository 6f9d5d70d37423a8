//! Payload encoding tests for control action lists.

use simctl_net::{decode_actions, encode_actions, BytesStack, DeliveryKind, DistributedMessage};
use simctl_types::ControlAction;
use proptest::prelude::*;

#[test]
fn test_roundtrip_preserves_pairs_and_order() {
    let actions = vec![
        ControlAction::state("upright"),
        ControlAction::new("color", "orange"),
        ControlAction::state(""),
        ControlAction::new("", "empty name"),
        ControlAction::state("ünïcode ✓"),
    ];
    let decoded = decode_actions(encode_actions(&actions)).unwrap();
    assert_eq!(decoded, actions);
}

#[test]
fn test_roundtrip_through_envelope_bytes() {
    let actions = vec![ControlAction::state("a"), ControlAction::state("b")];
    let msg = DistributedMessage::new(
        "cone-9",
        encode_actions(&actions),
        DeliveryKind::ReliableOrdered,
    );

    let bytes = msg.to_bytes().unwrap();
    let back = DistributedMessage::from_bytes(&bytes).unwrap();

    assert_eq!(back.address_key, "cone-9");
    assert_eq!(back.kind, DeliveryKind::ReliableOrdered);
    assert_eq!(decode_actions(back.content).unwrap(), actions);
}

#[test]
fn test_naive_push_order_reverses_pairs() {
    // Pushing action then value in list order and popping the same way
    // yields swapped fields and reversed pairs.
    let mut stack = BytesStack::new();
    for a in [ControlAction::state("a"), ControlAction::state("b")] {
        stack.push_string(&a.action);
        stack.push_string(&a.value);
    }
    let popped = decode_actions(stack).unwrap();
    assert_eq!(
        popped,
        vec![ControlAction::new("b", "state"), ControlAction::new("a", "state")]
    );
}

proptest! {
    #[test]
    fn test_roundtrip_arbitrary_lists(
        pairs in prop::collection::vec((".*", ".*"), 0..16),
    ) {
        let actions: Vec<ControlAction> = pairs
            .into_iter()
            .map(|(action, value)| ControlAction::new(action, value))
            .collect();
        let decoded = decode_actions(encode_actions(&actions)).unwrap();
        prop_assert_eq!(decoded, actions);
    }
}
