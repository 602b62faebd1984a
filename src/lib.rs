//! Perpus Digital Library Client
//!
//! Client side of a library management system: session persistence,
//! role-gated views, validated form submission and a REST client for the
//! library API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use services::session::{SessionContext, SessionStore};

/// Application state shared by all commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Open local storage, read the session once and wire the services to
    /// the HTTP API.
    pub fn build(config: AppConfig) -> AppResult<Self> {
        let storage = storage::FileStorage::open(&config.storage.path)?;
        tracing::debug!("Local storage at {}", storage.path().display());
        let session = SessionContext::initialize(SessionStore::new(Arc::new(storage)))?;
        let api = api::HttpApi::new(&config.api, session.clone())?;
        tracing::debug!("Library API at {}", api.base_url());

        Ok(Self {
            services: Arc::new(services::Services::new(Arc::new(api), session)),
            config: Arc::new(config),
        })
    }
}
