use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Environment, FlagManifest};

/// Errors from a strict manifest read.
///
/// Callers on the startup path never see these: [`ManifestLoader::load`]
/// swallows them into an empty manifest. Reload and `swbd check` use
/// [`ManifestLoader::try_load`] and surface them.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read flag manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse flag manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("flag manifest {path} is tagged for environment '{found}', expected '{expected}'")]
    EnvironmentMismatch {
        path: PathBuf,
        expected: Environment,
        found: Environment,
    },
}

/// Reads per-environment flag manifests from a directory.
///
/// The manifest for environment `env` lives at `<dir>/<env>.json`, structured
/// as `{ "environment": ..., "features": { name: record, ... } }`.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    dir: PathBuf,
}

impl ManifestLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn manifest_path(&self, environment: Environment) -> PathBuf {
        self.dir.join(format!("{environment}.json"))
    }

    /// Strict read: any missing file, malformed JSON, mistyped record, or
    /// mismatched environment tag is an error.
    pub fn try_load(&self, environment: Environment) -> Result<FlagManifest, LoadError> {
        let path = self.manifest_path(environment);
        let manifest = read_manifest(&path)?;

        if manifest.environment != environment {
            return Err(LoadError::EnvironmentMismatch {
                path,
                expected: environment,
                found: manifest.environment,
            });
        }

        Ok(manifest)
    }

    /// Fail-safe read for the startup path. A broken flag source must never
    /// crash the host process: on any error this logs a warning and returns
    /// an empty manifest, so every capability resolves disabled.
    pub fn load(&self, environment: Environment) -> FlagManifest {
        match self.try_load(environment) {
            Ok(manifest) => {
                tracing::info!(
                    "Loaded {} flags for environment '{}'",
                    manifest.features.len(),
                    environment
                );
                manifest
            }
            Err(e) => {
                tracing::warn!("{}. Falling back to an empty manifest", e);
                FlagManifest::empty(environment)
            }
        }
    }
}

fn read_manifest(path: &Path) -> Result<FlagManifest, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
