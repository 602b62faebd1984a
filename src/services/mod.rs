//! Client-side services

pub mod auth;
pub mod catalog;
pub mod forms;
pub mod loans;
pub mod session;

use std::sync::Arc;

use crate::api::LibraryApi;

use session::SessionContext;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: SessionContext,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services sharing `api` and `session`
    pub fn new(api: Arc<dyn LibraryApi>, session: SessionContext) -> Self {
        Self {
            auth: auth::AuthService::new(api.clone(), session.clone()),
            catalog: catalog::CatalogService::new(api.clone(), session.clone()),
            loans: loans::LoansService::new(api, session.clone()),
            session,
        }
    }
}
