//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod calendar;
pub mod checkin;
pub mod event;
pub mod notification;
pub mod registration;
pub mod stats;

// Re-export commonly used services
pub use auth::{AccessControl, AccessScope, Action, ActorContext};
pub use calendar::CalendarService;
pub use checkin::CheckInService;
pub use event::EventService;
pub use notification::{ConfirmationRequest, EventUpdateRequest, NotificationService};
pub use registration::RegistrationService;
pub use stats::StatsService;

use crate::config::settings::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::ticket::TicketRenderer;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub registration_service: RegistrationService,
    pub checkin_service: CheckInService,
    pub stats_service: StatsService,
    pub event_service: EventService,
    pub notification_service: NotificationService,
    pub calendar_service: CalendarService,
    pub access_control: AccessControl,
    pub database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: Settings) -> Result<Self> {
        let database = DatabaseService::new(pool);

        let access_control = AccessControl::new(database.clone(), settings.clone());
        let notification_service = NotificationService::new(settings.clone())?;
        let calendar_service = CalendarService::new(settings.clone());
        let renderer = TicketRenderer::new(settings.tickets.clone());

        let registration_service = RegistrationService::new(
            database.clone(),
            notification_service.clone(),
            calendar_service.clone(),
            renderer,
        );
        let checkin_service = CheckInService::new(database.clone(), access_control.clone());
        let stats_service = StatsService::new(database.clone());
        let event_service = EventService::new(database.clone(), access_control.clone());

        Ok(Self {
            registration_service,
            checkin_service,
            stats_service,
            event_service,
            notification_service,
            calendar_service,
            access_control,
            database,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self, pool: &DatabasePool) -> ServiceHealthStatus {
        let database_healthy = crate::database::health_check(pool).await.is_ok();

        ServiceHealthStatus {
            database_healthy,
            registration_service_ready: true,
            checkin_service_ready: true,
            stats_service_ready: true,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub registration_service_ready: bool,
    pub checkin_service_ready: bool,
    pub stats_service_ready: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
            && self.registration_service_ready
            && self.checkin_service_ready
            && self.stats_service_ready
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.registration_service_ready {
            issues.push("Registration service not ready".to_string());
        }
        if !self.checkin_service_ready {
            issues.push("Check-in service not ready".to_string());
        }
        if !self.stats_service_ready {
            issues.push("Stats service not ready".to_string());
        }

        issues
    }
}
