//! Capability registry and mount strategy.
//!
//! A capability is an optional route group gated by exactly one flag. The
//! registry is static: every capability name maps to a concrete route-group
//! constructor at compile time, so there is no runtime string-to-code
//! resolution and a capability whose flag was never authored shows up as an
//! unknown-flag warning instead of a silent no-op.
//!
//! Mounting evaluates each capability's flag exactly once, independently of
//! the others. An enabled capability is nested at its path prefix; a disabled
//! one contributes zero routes, so requests under its prefix fall through to
//! the router's default 404, indistinguishable from a path that never
//! existed, rather than a 403 that would reveal a gated feature.

mod export;
mod search;
mod stats;

use std::collections::BTreeSet;

use axum::Router;
use thiserror::Error;

use crate::api::AppState;
use crate::flags::FlagResolver;

/// One entry in the static capability registry: a flag name, the path prefix
/// the capability owns, and the constructor for its route group.
#[derive(Clone, Copy)]
pub struct CapabilitySpec {
    pub flag: &'static str,
    pub prefix: &'static str,
    pub routes: fn() -> Router<AppState>,
}

/// Every capability this server can mount. Prefixes must be disjoint; the
/// mount pass refuses overlapping ones.
pub fn registry() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec {
            flag: "search",
            prefix: "/search",
            routes: search::routes,
        },
        CapabilitySpec {
            flag: "export",
            prefix: "/export",
            routes: export::routes,
        },
        CapabilitySpec {
            flag: "stats",
            prefix: "/stats",
            routes: stats::routes,
        },
    ]
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("capability path prefixes '{first}' and '{second}' overlap")]
    OverlappingPrefixes { first: String, second: String },
}

/// The outcome of one mount pass. Recomputed from the resolver on every pass
/// and never cached, so a later pass re-evaluates every flag.
pub struct MountPlan {
    entries: Vec<PlannedMount>,
}

struct PlannedMount {
    spec: CapabilitySpec,
    enabled: bool,
}

/// Evaluates each capability's flag once and records the mount decision.
///
/// Overlapping path prefixes are a configuration error, not something to
/// resolve by precedence: the host must refuse to start rather than let one
/// capability shadow another.
pub fn plan(resolver: &FlagResolver, specs: Vec<CapabilitySpec>) -> Result<MountPlan, MountError> {
    for (i, a) in specs.iter().enumerate() {
        for b in &specs[i + 1..] {
            if prefixes_overlap(a.prefix, b.prefix) {
                return Err(MountError::OverlappingPrefixes {
                    first: a.prefix.to_string(),
                    second: b.prefix.to_string(),
                });
            }
        }
    }

    let entries = specs
        .into_iter()
        .map(|spec| {
            let enabled = resolver.is_enabled(spec.flag);
            if enabled {
                tracing::info!("Mounting capability '{}' at {}", spec.flag, spec.prefix);
            } else {
                tracing::info!(
                    "Capability '{}' is disabled, leaving {} unmounted",
                    spec.flag,
                    spec.prefix
                );
            }
            PlannedMount { spec, enabled }
        })
        .collect();

    Ok(MountPlan { entries })
}

impl MountPlan {
    /// Prefixes that will actually be bound. Invocation order of the specs
    /// never changes this set.
    pub fn mounted_prefixes(&self) -> BTreeSet<&'static str> {
        self.entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.spec.prefix)
            .collect()
    }

    /// Builds the router holding every enabled route group. Disabled
    /// capabilities are absent entirely; their handler code stays compiled
    /// but unreachable.
    pub fn into_router(self) -> Router<AppState> {
        let mut router = Router::new();
        for entry in self.entries {
            if entry.enabled {
                router = router.nest(entry.spec.prefix, (entry.spec.routes)());
            }
        }
        router
    }
}

fn prefixes_overlap(a: &str, b: &str) -> bool {
    a == b || a.starts_with(&format!("{b}/")) || b.starts_with(&format!("{a}/"))
}
