//! Ownership and routing of spawned controllable entities.
//!
//! Spawning moves an entity into the registry and, when a messages manager
//! is attached, registers its uid for routing. Despawning drops it, which
//! unregisters it and runs the entity's teardown.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info};

use simctl_net::{DistributedMessage, MessagesManager, Replicated};
use simctl_types::{ControlAction, Controllable, Uid};

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateUid(Uid),
    UnknownUid(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUid(uid) => write!(f, "'{}' is already spawned", uid),
            Self::UnknownUid(uid) => write!(f, "no controllable with uid '{}'", uid),
        }
    }
}

impl std::error::Error for RegistryError {}

pub type Entity = Replicated<Box<dyn Controllable>>;

/// All controllables spawned in this process.
#[derive(Default)]
pub struct ControllableRegistry {
    manager: Option<Arc<dyn MessagesManager>>,
    entities: BTreeMap<Uid, Entity>,
}

impl ControllableRegistry {
    /// Registry without replication.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose entities replicate through `manager`.
    pub fn with_manager(manager: Arc<dyn MessagesManager>) -> Self {
        Self {
            manager: Some(manager),
            entities: BTreeMap::new(),
        }
    }

    pub fn spawn(&mut self, entity: Box<dyn Controllable>) -> Result<(), RegistryError> {
        let uid = entity.uid().clone();
        if self.entities.contains_key(&uid) {
            return Err(RegistryError::DuplicateUid(uid));
        }
        let entity = Replicated::new(entity, self.manager.clone());
        info!("Registered {} '{}'", entity.control_type(), uid);
        self.entities.insert(uid, entity);
        Ok(())
    }

    /// Remove and drop an entity.
    pub fn despawn(&mut self, uid: &str) -> Result<(), RegistryError> {
        match self.entities.remove(uid) {
            Some(entity) => {
                info!("Despawning {} '{}'", entity.control_type(), uid);
                Ok(())
            }
            None => Err(RegistryError::UnknownUid(uid.to_string())),
        }
    }

    pub fn control(&mut self, uid: &str, actions: &[ControlAction]) -> Result<(), RegistryError> {
        let entity = self
            .entities
            .get_mut(uid)
            .ok_or_else(|| RegistryError::UnknownUid(uid.to_string()))?;
        entity.control(actions);
        Ok(())
    }

    /// Route a peer message to the entity it is addressed to.
    pub fn deliver(&mut self, message: DistributedMessage) -> Result<(), RegistryError> {
        let entity = self
            .entities
            .get_mut(message.address_key.as_str())
            .ok_or_else(|| RegistryError::UnknownUid(message.address_key.clone()))?;
        debug!("Delivering message to '{}'", message.address_key);
        entity.receive_message(message);
        Ok(())
    }

    pub fn get(&self, uid: &str) -> Option<&Entity> {
        self.entities.get(uid)
    }

    pub fn uids(&self) -> impl Iterator<Item = &Uid> {
        self.entities.keys()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
