use crate::config::Config;
use crate::evaluation::pipeline::Pipeline;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Stateless; the per-session credential travels with each run.
    pub pipeline: Pipeline,
    pub config: Config,
}
