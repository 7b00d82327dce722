//! Community group repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::group::{Group, CreateGroupRequest, UpdateGroupRequest};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group
    pub async fn create(&self, request: CreateGroupRequest) -> Result<Group, EventBuddyError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, description, leader_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, leader_id, is_active, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.leader_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find group by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Group>, EventBuddyError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, name, description, leader_id, is_active, created_at, updated_at FROM groups WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Update group
    pub async fn update(&self, id: i64, request: UpdateGroupRequest) -> Result<Group, EventBuddyError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                leader_id = COALESCE($4, leader_id),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
            RETURNING id, name, description, leader_id, is_active, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.leader_id)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete group
    pub async fn delete(&self, id: i64) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List active groups
    pub async fn list_active(&self) -> Result<Vec<Group>, EventBuddyError> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, name, description, leader_id, is_active, created_at, updated_at FROM groups WHERE is_active = true ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Count total groups
    pub async fn count(&self) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
