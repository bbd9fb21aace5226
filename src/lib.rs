//! Switchboard: environment-scoped feature flags with conditional route
//! mounting.
//!
//! A flag manifest is authored per environment (`flags/stage.json`,
//! `flags/production.json`, ...) and loaded once at startup. Route groups for
//! optional capabilities are bound into the HTTP router only when their flag
//! is enabled; a disabled capability leaves no routes behind, so requests to
//! its path space fall through to a plain 404.
//!
//! The manifest can be reloaded at runtime without restarting the process.
//! Reload swaps the resolver state atomically and immediately affects flag
//! queries, but it does not rebind routes; see [`flags::FlagResolver::reload`].

pub mod api;
pub mod capability;
pub mod client;
pub mod flags;
pub mod store;
