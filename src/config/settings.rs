//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub tickets: TicketConfig,
    pub organization: OrganizationConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Transactional mail API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
    pub timeout_seconds: u64,
}

/// Ticket rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketConfig {
    /// Base URL of the QR image renderer the ticket token is embedded into
    pub qr_render_url: String,
    /// Rendered image edge length in pixels
    pub qr_image_size: u32,
}

/// Organization-wide settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganizationConfig {
    /// People with unrestricted access to every event's door operations
    pub admin_ids: Vec<i64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub confirmation_emails: bool,
    pub calendar_links: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("EVENTBUDDY"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/eventbuddy".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            mail: MailConfig {
                api_url: "https://api.mail.example.com/v1/send".to_string(),
                api_key: String::new(),
                from_address: "tickets@eventbuddy.example.com".to_string(),
                from_name: "EventBuddy".to_string(),
                timeout_seconds: 10,
            },
            tickets: TicketConfig {
                qr_render_url: "https://quickchart.io/qr".to_string(),
                qr_image_size: 300,
            },
            organization: OrganizationConfig { admin_ids: vec![] },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/eventbuddy".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                confirmation_emails: true,
                calendar_links: true,
            },
        }
    }
}
