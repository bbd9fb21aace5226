use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The environment a process serves. Selected once at startup and never
/// re-read; each environment has its own manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Stage,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single feature flag.
///
/// Only `enabled` gates behavior. The remaining fields are documentation for
/// whoever edits the manifest; in particular `status` is a lifecycle note
/// ("in_development", "live", ...) and never consulted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl FlagRecord {
    /// A bare disabled record, used for the client mirror's fallback set.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            description: None,
            owner: None,
            status: None,
        }
    }
}

/// The full set of flag records for one environment.
///
/// Flag names are unique by construction. A name that is absent is distinct
/// from one defined with `enabled: false`: the resolver reports both as
/// disabled, but absence is logged as an unknown-flag warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagManifest {
    pub environment: Environment,
    pub features: BTreeMap<String, FlagRecord>,
}

impl FlagManifest {
    /// The fail-safe value: no flags defined, everything resolves disabled.
    pub fn empty(environment: Environment) -> Self {
        Self {
            environment,
            features: BTreeMap::new(),
        }
    }

    /// Names of every flag whose `enabled` is true.
    pub fn enabled_names(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .filter(|(_, record)| record.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }
}
