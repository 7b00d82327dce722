//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use regex::Regex;
use url::Url;

use crate::utils::errors::{EventBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_mail_config(&settings.mail)?;
    validate_ticket_config(&settings.tickets)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventBuddyError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(EventBuddyError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate mail API configuration
fn validate_mail_config(config: &super::MailConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(EventBuddyError::Config(
            "Mail API URL is required".to_string()
        ));
    }

    Url::parse(&config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(EventBuddyError::Config(
            "Mail API timeout must be greater than 0".to_string()
        ));
    }

    let address_shape = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| EventBuddyError::Config(format!("Invalid sender address pattern: {}", e)))?;
    if !address_shape.is_match(&config.from_address) {
        return Err(EventBuddyError::Config(
            format!("Sender address is not a valid email: {}", config.from_address)
        ));
    }

    Ok(())
}

/// Validate ticket rendering configuration
fn validate_ticket_config(config: &super::TicketConfig) -> Result<()> {
    if config.qr_render_url.is_empty() {
        return Err(EventBuddyError::Config(
            "QR render URL is required".to_string()
        ));
    }

    Url::parse(&config.qr_render_url)?;

    if config.qr_image_size == 0 {
        return Err(EventBuddyError::Config(
            "QR image size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
