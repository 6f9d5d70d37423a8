use std::path::PathBuf;

use serde::Deserialize;

use simctl_types::{ControlPolicy, DiagnosticLevel, TrafficCone};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Upper bound on loopback clients, wherever the count comes from.
pub const MAX_PEERS: usize = 64;

pub fn clamp_peers(peers: usize) -> usize {
    peers.min(MAX_PEERS)
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    cone: ConeConfig,
    #[serde(default)]
    diagnostics: DiagnosticsConfig,
    #[serde(default)]
    network: NetworkConfig,
}

#[derive(Deserialize, Default)]
struct ConeConfig {
    control_type: Option<String>,
    default_control_policy: Option<ControlPolicy>,
    valid_states: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct DiagnosticsConfig {
    unknown_action: Option<String>,
}

#[derive(Deserialize, Default)]
struct NetworkConfig {
    peers: Option<usize>,
}

pub struct Config {
    cone: ConeConfig,
    diagnostics: DiagnosticsConfig,
    network: NetworkConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        let mut config = Self::embedded();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => config.merge(user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Embedded defaults with `contents` layered on top.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let user: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    fn embedded() -> Self {
        // The embedded file is checked by the `embedded_config_parses` test.
        let base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_default();
        Config {
            cone: base.cone,
            diagnostics: base.diagnostics,
            network: base.network,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        if user.cone.control_type.is_some() {
            self.cone.control_type = user.cone.control_type;
        }
        if user.cone.default_control_policy.is_some() {
            self.cone.default_control_policy = user.cone.default_control_policy;
        }
        if user.cone.valid_states.is_some() {
            self.cone.valid_states = user.cone.valid_states;
        }
        if user.diagnostics.unknown_action.is_some() {
            self.diagnostics.unknown_action = user.diagnostics.unknown_action;
        }
        if user.network.peers.is_some() {
            self.network.peers = user.network.peers;
        }
    }

    pub fn control_type(&self) -> &str {
        self.cone.control_type.as_deref().unwrap_or("cone")
    }

    pub fn default_control_policy(&self) -> ControlPolicy {
        self.cone.default_control_policy.clone().unwrap_or_default()
    }

    pub fn valid_states(&self) -> Vec<String> {
        self.cone.valid_states.clone().unwrap_or_default()
    }

    /// Level override for rejected actions; `None` keeps each entity's default.
    pub fn unknown_action_level(&self) -> Option<DiagnosticLevel> {
        let raw = self.diagnostics.unknown_action.as_deref()?;
        if raw.is_empty() {
            return None;
        }
        let level = DiagnosticLevel::parse(raw);
        if level.is_none() {
            log::warn!(target: "config", "ignoring unknown diagnostics level '{}'", raw);
        }
        level
    }

    /// Loopback clients for the demo (clamped to 0..=MAX_PEERS).
    pub fn peers(&self) -> usize {
        clamp_peers(self.network.peers.unwrap_or(2))
    }

    /// Build a state-accepting cone from the configured defaults.
    pub fn cone(&self, uid: &str) -> TrafficCone {
        let mut builder = TrafficCone::builder(uid)
            .control_type(self.control_type())
            .valid_states(self.valid_states())
            .default_control_policy(self.default_control_policy());
        if let Some(level) = self.unknown_action_level() {
            builder = builder.diagnostics(level);
        }
        builder.build()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("simctl").join("config.toml"))
}
