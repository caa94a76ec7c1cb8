use std::sync::Arc;

use brush_pipeline::Pipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Job, queue, result and image workflows over the configured backends.
    pub pipeline: Pipeline,
    /// Server configuration (the auth extractor reads the shared secret here).
    pub config: Arc<ServerConfig>,
}
