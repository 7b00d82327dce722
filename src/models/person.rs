//! Person model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub full_name: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Roles a person can hold across the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonRole {
    Attendee,
    Leader,
    Admin,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Attendee => "attendee",
            PersonRole::Leader => "leader",
            PersonRole::Admin => "admin",
        }
    }

    /// Unknown role strings fall back to the least-privileged role.
    pub fn parse(value: &str) -> PersonRole {
        match value {
            "leader" => PersonRole::Leader,
            "admin" => PersonRole::Admin,
            _ => PersonRole::Attendee,
        }
    }
}

impl Person {
    pub fn role(&self) -> PersonRole {
        PersonRole::parse(&self.role)
    }
}
