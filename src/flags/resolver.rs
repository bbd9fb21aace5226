use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use super::{Environment, FlagManifest, FlagRecord, LoadError, ManifestLoader};

/// Answers enablement queries over the active manifest.
///
/// The resolver owns its state behind an [`ArcSwap`], so every query reads a
/// complete manifest and [`reload`](Self::reload) replaces it in one atomic
/// store. Handles are cheap to clone and are passed explicitly to whatever
/// needs to query flags (mount pass, API handlers); there is no process-wide
/// instance.
#[derive(Clone)]
pub struct FlagResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    environment: Environment,
    loader: ManifestLoader,
    state: ArcSwap<FlagManifest>,
    // Serializes reload passes; queries never take it.
    reload_lock: Mutex<()>,
}

impl FlagResolver {
    /// Performs the initial, fail-safe load for `environment`. A broken
    /// source yields an empty manifest rather than an error.
    pub fn new(loader: ManifestLoader, environment: Environment) -> Self {
        let manifest = loader.load(environment);
        Self {
            inner: Arc::new(ResolverInner {
                environment,
                loader,
                state: ArcSwap::from_pointee(manifest),
                reload_lock: Mutex::new(()),
            }),
        }
    }

    /// True iff `name` is defined in the active manifest with `enabled: true`.
    ///
    /// An undefined name is reported as disabled, with a warning. Externally
    /// both cases look the same, but the log line tells an operator whether a
    /// flag was switched off or never authored.
    pub fn is_enabled(&self, name: &str) -> bool {
        match self.inner.state.load().features.get(name) {
            Some(record) => record.enabled,
            None => {
                tracing::warn!("Queried unknown flag '{}', treating as disabled", name);
                false
            }
        }
    }

    /// The record for `name`, or `None` if the manifest does not define it.
    pub fn describe(&self, name: &str) -> Option<FlagRecord> {
        self.inner.state.load().features.get(name).cloned()
    }

    /// Names of every flag currently enabled.
    pub fn enabled_names(&self) -> BTreeSet<String> {
        self.inner.state.load().enabled_names()
    }

    /// The full active manifest. This is the shape published to the client
    /// tier, so the flag query endpoint serves it verbatim.
    pub fn snapshot(&self) -> Arc<FlagManifest> {
        self.inner.state.load_full()
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    /// Re-reads the manifest source and atomically replaces the active state.
    ///
    /// Unlike the initial load, a reload failure keeps the previous manifest
    /// in place: a configuration that was working is safer to keep than to
    /// discard for an empty one. Reload passes are serialized.
    ///
    /// Reloading does not rebind routes. Capabilities mounted at startup stay
    /// mounted whatever the new manifest says; the new state is visible to
    /// flag queries immediately, and to mounting only on the next mount pass.
    pub fn reload(&self) -> Result<Arc<FlagManifest>, LoadError> {
        let _guard = self.inner.reload_lock.lock().expect("reload lock poisoned");

        let manifest = Arc::new(self.inner.loader.try_load(self.inner.environment)?);
        self.inner.state.store(manifest.clone());

        tracing::info!(
            "Reloaded flag manifest for '{}': {} flags, {} enabled",
            self.inner.environment,
            manifest.features.len(),
            manifest.enabled_names().len()
        );

        Ok(manifest)
    }
}
