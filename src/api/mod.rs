mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::capability::{self, MountError};
use crate::flags::FlagResolver;
use crate::store::RecordStore;

/// Shared state handed to every handler: the flag resolver and the opaque
/// record store the capability groups read.
#[derive(Clone)]
pub struct AppState {
    pub resolver: FlagResolver,
    pub store: RecordStore,
}

/// Assembles the full router: flag introspection endpoints plus one mount
/// pass over the capability registry.
///
/// Fails only on an overlapping capability prefix, which is a configuration
/// error the host must refuse to start on. Runs synchronously on the startup
/// path, before the listener is bound.
pub fn create_router(resolver: FlagResolver, store: RecordStore) -> Result<Router, MountError> {
    let state = AppState { resolver, store };

    let capabilities = capability::plan(&state.resolver, capability::registry())?.into_router();

    let api = Router::new()
        .route("/flags", get(handlers::get_flags))
        .route("/flags/reload", post(handlers::reload_flags))
        .route("/flags/{name}", get(handlers::describe_flag))
        .route("/health", get(handlers::health))
        .merge(capabilities);

    Ok(Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
