//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap: settings sit behind an `Arc` and every service
/// collaborator is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub services: Services,
}

impl AppState {
    pub fn new(settings: Settings, services: Services) -> Self {
        Self {
            settings: Arc::new(settings),
            services,
        }
    }
}
