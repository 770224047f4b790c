use std::sync::Arc;

use crate::config::Config;
use crate::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when relay credentials are absent; submissions are then accepted without delivery.
    pub mailer: Option<Arc<dyn Mailer>>,
}
