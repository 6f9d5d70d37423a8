//! Replication wrapper for controllable entities.
//!
//! The master applies actions locally and then broadcasts them; every other
//! peer applies what it receives and never re-broadcasts.

use std::sync::Arc;

use log::{debug, warn};

use simctl_types::{ControlAction, ControlPolicy, Controllable, Uid};

use crate::codec::{decode_actions, encode_actions};
use crate::manager::MessagesManager;
use crate::protocol::{DeliveryKind, DistributedMessage};

/// A controllable entity whose master-side actions are mirrored to peers.
pub struct Replicated<C: Controllable> {
    inner: C,
    manager: Option<Arc<dyn MessagesManager>>,
}

impl<C: Controllable> Replicated<C> {
    /// Wrap `inner` and register its uid with `manager`. Without a manager
    /// the wrapper behaves like the bare entity.
    pub fn new(inner: C, manager: Option<Arc<dyn MessagesManager>>) -> Self {
        if let Some(manager) = &manager {
            manager.register_object(inner.uid().as_str());
        }
        Self { inner, manager }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Routing key, equal to the entity uid.
    pub fn key(&self) -> &str {
        self.inner.uid().as_str()
    }

    /// Apply a message broadcast by the master.
    pub fn receive_message(&mut self, message: DistributedMessage) {
        if message.address_key != self.key() {
            warn!(
                "'{}' received message addressed to '{}', ignoring",
                self.key(),
                message.address_key
            );
            return;
        }
        match decode_actions(message.content) {
            Ok(actions) => {
                debug!("'{}' applying {} replicated actions", self.key(), actions.len());
                self.inner.control(&actions);
            }
            Err(e) => warn!("'{}' dropped malformed control message: {}", self.key(), e),
        }
    }

    fn replicate(&self, actions: &[ControlAction]) {
        let Some(manager) = &self.manager else {
            return;
        };
        if !manager.is_master() || actions.is_empty() {
            return;
        }
        let message = DistributedMessage::new(
            self.key(),
            encode_actions(actions),
            DeliveryKind::ReliableOrdered,
        );
        debug!("'{}' broadcasting {} actions", self.key(), actions.len());
        manager.broadcast_message(message);
    }
}

impl<C: Controllable> Controllable for Replicated<C> {
    fn uid(&self) -> &Uid {
        self.inner.uid()
    }

    fn control_type(&self) -> &str {
        self.inner.control_type()
    }

    fn valid_states(&self) -> &[String] {
        self.inner.valid_states()
    }

    fn valid_actions(&self) -> Vec<String> {
        self.inner.valid_actions()
    }

    fn default_control_policy(&self) -> &ControlPolicy {
        self.inner.default_control_policy()
    }

    fn current_control_policy(&self) -> &ControlPolicy {
        self.inner.current_control_policy()
    }

    fn current_state(&self) -> &str {
        self.inner.current_state()
    }

    fn control(&mut self, actions: &[ControlAction]) {
        self.inner.control(actions);
        self.replicate(actions);
    }
}

impl<C: Controllable> Drop for Replicated<C> {
    fn drop(&mut self) {
        if let Some(manager) = &self.manager {
            manager.unregister_object(self.inner.uid().as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use simctl_types::TrafficCone;

    use super::*;
    use crate::stack::BytesStack;

    #[derive(Default)]
    struct Recorder {
        master: bool,
        registered: RefCell<Vec<String>>,
        sent: RefCell<Vec<DistributedMessage>>,
        unregistered: Cell<usize>,
    }

    impl MessagesManager for Recorder {
        fn is_master(&self) -> bool {
            self.master
        }
        fn register_object(&self, key: &str) {
            self.registered.borrow_mut().push(key.to_string());
        }
        fn unregister_object(&self, key: &str) {
            self.registered.borrow_mut().retain(|k| k != key);
            self.unregistered.set(self.unregistered.get() + 1);
        }
        fn broadcast_message(&self, message: DistributedMessage) {
            self.sent.borrow_mut().push(message);
        }
    }

    fn recorder(master: bool) -> Arc<Recorder> {
        Arc::new(Recorder {
            master,
            ..Default::default()
        })
    }

    fn shared(rec: &Arc<Recorder>) -> Option<Arc<dyn MessagesManager>> {
        let manager: Arc<dyn MessagesManager> = rec.clone();
        Some(manager)
    }

    #[test]
    fn master_broadcasts_once() {
        let rec = recorder(true);
        let mut cone = Replicated::new(TrafficCone::new("c1"), shared(&rec));
        cone.control(&[ControlAction::state("a"), ControlAction::state("b")]);

        assert_eq!(cone.current_state(), "b");
        let sent = rec.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address_key, "c1");
        assert_eq!(sent[0].kind, DeliveryKind::ReliableOrdered);
    }

    #[test]
    fn client_does_not_broadcast() {
        let rec = recorder(false);
        let mut cone = Replicated::new(TrafficCone::new("c1"), shared(&rec));
        cone.control(&[ControlAction::state("a")]);
        assert_eq!(cone.current_state(), "a");
        assert!(rec.sent.borrow().is_empty());
    }

    #[test]
    fn empty_list_is_not_broadcast() {
        let rec = recorder(true);
        let mut cone = Replicated::new(TrafficCone::new("c1"), shared(&rec));
        cone.control(&[]);
        assert!(rec.sent.borrow().is_empty());
    }

    #[test]
    fn unknown_actions_are_still_forwarded() {
        let rec = recorder(true);
        let mut cone = Replicated::new(TrafficCone::new("c1"), shared(&rec));
        cone.control(&[ControlAction::new("blink", "1")]);
        assert_eq!(cone.current_state(), "");
        assert_eq!(rec.sent.borrow().len(), 1);
    }

    #[test]
    fn no_manager_is_silent() {
        let mut cone = Replicated::new(TrafficCone::new("c1"), None);
        cone.control(&[ControlAction::state("a")]);
        assert_eq!(cone.current_state(), "a");
    }

    #[test]
    fn registration_follows_lifetime() {
        let rec = recorder(false);
        {
            let _cone = Replicated::new(TrafficCone::new("c1"), shared(&rec));
            assert_eq!(*rec.registered.borrow(), vec!["c1".to_string()]);
        }
        assert!(rec.registered.borrow().is_empty());
        assert_eq!(rec.unregistered.get(), 1);
    }

    #[test]
    fn receive_applies_without_rebroadcast() {
        let master = recorder(true);
        let mut source = Replicated::new(TrafficCone::new("c1"), shared(&master));
        source.control(&[ControlAction::state("a"), ControlAction::state("b")]);
        let message = master.sent.borrow_mut().remove(0);

        let client = recorder(false);
        let mut replica = Replicated::new(TrafficCone::new("c1"), shared(&client));
        replica.receive_message(message);
        assert_eq!(replica.current_state(), "b");
        assert!(client.sent.borrow().is_empty());
    }

    #[test]
    fn receive_ignores_other_keys() {
        let mut replica = Replicated::new(TrafficCone::new("c1"), None);
        let message = DistributedMessage::new(
            "c2",
            encode_actions(&[ControlAction::state("a")]),
            DeliveryKind::ReliableOrdered,
        );
        replica.receive_message(message);
        assert_eq!(replica.current_state(), "");
    }

    #[test]
    fn receive_drops_malformed_payload() {
        let mut replica = Replicated::new(TrafficCone::new("c1"), None);
        let mut content = BytesStack::new();
        content.push_string("state");
        replica.receive_message(DistributedMessage::new(
            "c1",
            content,
            DeliveryKind::ReliableOrdered,
        ));
        assert_eq!(replica.current_state(), "");
    }
}
