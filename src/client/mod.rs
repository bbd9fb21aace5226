//! Client-tier flag mirror.
//!
//! The presentation tier never reads the manifest source directly. It fetches
//! the published, already-resolved flag map for its environment (a static
//! artifact the build step derives from the same manifest, or the server's
//! `/api/v1/flags` endpoint, which serves the identical shape) and answers
//! the same enablement queries over that immutable snapshot.
//!
//! There is no live reload channel on this side: a fresh [`MirrorClient::load`]
//! is the only refresh mechanism.

use reqwest::StatusCode;
use thiserror::Error;

use crate::flags::{Environment, FlagManifest, FlagRecord};

/// Flags the fallback manifest defines when the published map cannot be
/// fetched. All disabled, so an unreachable flag source hides every gated
/// section instead of revealing one.
const FALLBACK_FLAGS: &[&str] = &["search", "export", "stats", "dark_mode"];

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("flag map request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("flag map endpoint returned {0}")]
    Status(StatusCode),
}

/// Fetches the published flag map for one environment.
///
/// The environment is injected explicitly at construction; the mirror never
/// guesses it from its surroundings.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    url: String,
    environment: Environment,
    http: reqwest::Client,
}

impl MirrorClient {
    pub fn new(url: impl Into<String>, environment: Environment) -> Self {
        Self {
            url: url.into(),
            environment,
            http: reqwest::Client::new(),
        }
    }

    /// Single fetch, no retry. Any transport failure or non-2xx status logs
    /// a warning and yields the all-disabled fallback; the caller never sees
    /// an error.
    pub async fn load(&self) -> FlagMirror {
        match self.try_load().await {
            Ok(manifest) => FlagMirror { manifest },
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch published flag map from {}: {}. Falling back to all-disabled flags",
                    self.url,
                    e
                );
                FlagMirror::fallback(self.environment)
            }
        }
    }

    async fn try_load(&self) -> Result<FlagManifest, MirrorError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

/// An immutable flag snapshot for the presentation tier. Mirrors the server
/// resolver's query surface, minus reload.
#[derive(Debug, Clone)]
pub struct FlagMirror {
    manifest: FlagManifest,
}

impl FlagMirror {
    /// The hard-coded minimal manifest: every known flag present, every one
    /// disabled.
    pub fn fallback(environment: Environment) -> Self {
        Self {
            manifest: FlagManifest {
                environment,
                features: FALLBACK_FLAGS
                    .iter()
                    .map(|name| (name.to_string(), FlagRecord::disabled()))
                    .collect(),
            },
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        match self.manifest.features.get(name) {
            Some(record) => record.enabled,
            None => {
                tracing::warn!("Queried unknown flag '{}', treating as disabled", name);
                false
            }
        }
    }

    pub fn describe(&self, name: &str) -> Option<&FlagRecord> {
        self.manifest.features.get(name)
    }

    pub fn enabled_names(&self) -> std::collections::BTreeSet<String> {
        self.manifest.enabled_names()
    }

    pub fn environment(&self) -> Environment {
        self.manifest.environment
    }

    /// The declarative visibility sweep: every section tagged with a flag
    /// name is shown iff that flag is enabled. Run once after load; safe to
    /// re-run manually.
    pub fn apply_visibility(&self, sections: &mut [TaggedSection]) {
        for section in sections {
            section.visible = self.is_enabled(&section.flag);
        }
    }
}

/// A UI section gated by one flag. Sections start hidden until a sweep runs,
/// so a section is never shown before its flag has been consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSection {
    pub flag: String,
    pub visible: bool,
}

impl TaggedSection {
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            visible: false,
        }
    }
}
