use std::sync::Arc;

use whodunit_engine::SessionRegistry;

#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) registry: Arc<SessionRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}
