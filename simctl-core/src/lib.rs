//! # simctl-core
//!
//! Host-side plumbing for simctl: configuration, the registry that owns
//! spawned controllables, and the JSON control API used by scenario runners.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use simctl_core::api::{load_scenario, run_scenario};
//! use simctl_core::config::Config;
//! use simctl_core::registry::ControllableRegistry;
//!
//! let config = Config::load();
//! let mut registry = ControllableRegistry::new();
//! registry.spawn(Box::new(config.cone("cone-1")))?;
//!
//! let scenario = load_scenario(path)?;
//! run_scenario(&mut registry, &scenario);
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] — TOML configuration loading (embedded defaults + user override)
//! - [`registry`] — `ControllableRegistry`: spawn/despawn, control, message delivery
//! - [`api`] — `ControlRequest`/`Scenario` JSON types and helpers

pub mod api;
pub mod config;
pub mod registry;
