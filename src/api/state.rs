//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, HealthProbe};
use crate::services::{AuthService, OperationLog, ServiceContainer, Services, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Store connectivity check behind `/health`
    pub probe: Arc<dyn HealthProbe>,
    /// Whether verification failures carry a message
    pub verify_detailed_errors: bool,
    /// Failures rejected before a service is reached (body, path, ownership)
    pub log: OperationLog,
}

impl AppState {
    /// Create application state from a connected database and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::from_services(&services, database, config.verify_detailed_errors)
    }

    /// Create application state from any service container.
    pub fn from_services(
        services: &dyn ServiceContainer,
        probe: Arc<dyn HealthProbe>,
        verify_detailed_errors: bool,
    ) -> Self {
        Self::new(services.auth(), services.users(), probe, verify_detailed_errors)
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        probe: Arc<dyn HealthProbe>,
        verify_detailed_errors: bool,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            probe,
            verify_detailed_errors,
            log: OperationLog::new(tracing::info_span!("requests")),
        }
    }
}
