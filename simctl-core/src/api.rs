//! JSON control surface for scenario runners.
//!
//! A request names one controllable and the actions to apply to it:
//!
//! ```json
//! { "uid": "cone-1", "actions": [{ "action": "state", "value": "knocked_over" }] }
//! ```
//!
//! A scenario file is `{ "steps": [request, ...] }`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use simctl_types::ControlAction;

use crate::registry::{ControllableRegistry, RegistryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRequest {
    pub uid: String,
    #[serde(default)]
    pub actions: Vec<ControlAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<ControlRequest>,
}

impl Scenario {
    /// Distinct uids in first-appearance order.
    pub fn uids(&self) -> Vec<&str> {
        let mut uids: Vec<&str> = Vec::new();
        for step in &self.steps {
            if !uids.contains(&step.uid.as_str()) {
                uids.push(&step.uid);
            }
        }
        uids
    }
}

/// Error type for the control API.
#[derive(Debug)]
pub enum ApiError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Registry(RegistryError),
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Registry(e) => write!(f, "registry error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

pub fn parse_request(json: &str) -> Result<ControlRequest, ApiError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ApiError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn apply_request(
    registry: &mut ControllableRegistry,
    request: &ControlRequest,
) -> Result<(), ApiError> {
    registry.control(&request.uid, &request.actions)?;
    Ok(())
}

/// Apply every step in order. Steps naming an unknown uid are logged and
/// skipped; returns how many steps were applied.
pub fn run_scenario(registry: &mut ControllableRegistry, scenario: &Scenario) -> usize {
    let mut applied = 0;
    for step in &scenario.steps {
        match apply_request(registry, step) {
            Ok(()) => applied += 1,
            Err(e) => log::warn!("skipping scenario step for '{}': {}", step.uid, e),
        }
    }
    applied
}
