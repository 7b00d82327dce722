//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the EventBuddy application.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must stay alive for the process lifetime or buffered
/// log lines are lost on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventbuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log registration outcomes with structured data
pub fn log_registration(event_id: i64, attendee_id: i64, email: &str) {
    info!(
        event_id = event_id,
        attendee_id = attendee_id,
        email = email,
        "Attendee registered"
    );
}

/// Log door check-in activity
pub fn log_check_in(event_id: i64, attendee_id: i64, actor_id: i64, repeated: bool) {
    info!(
        event_id = event_id,
        attendee_id = attendee_id,
        actor_id = actor_id,
        repeated = repeated,
        "Check-in recorded"
    );
}
