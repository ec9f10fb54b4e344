// App state for Axum server
use std::sync::Arc;

use axioma_engine::Engines;

use crate::auth::IdentityVerifier;

/// Identity of the running service, reported by the health endpoint.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub revision: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engines: Engines,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub service: Arc<ServiceInfo>,
}
