use std::sync::Arc;

use services::{CatalogService, SessionWorkflow};

/// UI-facing surface of the composition root.
pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<CatalogService>;
    fn session_workflow(&self) -> Arc<SessionWorkflow>;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<CatalogService>,
    session_workflow: Arc<SessionWorkflow>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            session_workflow: app.session_workflow(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session_workflow(&self) -> Arc<SessionWorkflow> {
        Arc::clone(&self.session_workflow)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
