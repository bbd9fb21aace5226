//! Flag manifest model, loader, and resolver.
//!
//! # Core Concepts
//!
//! - [`FlagManifest`]: the full set of flag records for one environment,
//!   authored declaratively and consumed read-only.
//! - [`ManifestLoader`]: reads a manifest from disk. Initial load is
//!   fail-safe-closed: a broken source yields an empty manifest (everything
//!   disabled), never a crash.
//! - [`FlagResolver`]: answers enablement queries over the active manifest
//!   and swaps it atomically on reload. Concurrent readers always see a
//!   whole manifest, old or new, never a partial one.

mod loader;
mod manifest;
mod resolver;

pub use loader::*;
pub use manifest::*;
pub use resolver::*;
