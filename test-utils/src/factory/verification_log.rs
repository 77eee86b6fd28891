//! Verification log factory for creating test log rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test verification log rows with customizable fields.
pub struct VerificationLogFactory<'a> {
    db: &'a DatabaseConnection,
    discord_id: String,
    discord_name: String,
    external_username: String,
    external_id: String,
    method: String,
}

impl<'a> VerificationLogFactory<'a> {
    /// Creates a new VerificationLogFactory with default values.
    ///
    /// Defaults:
    /// - discord_id: `"{id}"` where id is auto-incremented
    /// - discord_name: `"User {id}"`
    /// - external_username: `"Player{id}"`
    /// - external_id: `"{id}"`
    /// - method: `"Game Entry"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `VerificationLogFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            discord_id: format!("{}", 200_000 + id),
            discord_name: format!("User {}", id),
            external_username: format!("Player{}", id),
            external_id: format!("{}", 300_000 + id),
            method: "Game Entry".to_string(),
        }
    }

    /// Sets the Discord actor ID.
    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = discord_id.into();
        self
    }

    /// Sets the external username.
    pub fn external_username(mut self, external_username: impl Into<String>) -> Self {
        self.external_username = external_username.into();
        self
    }

    /// Sets the verification method label.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Inserts the log row and returns the created entity.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted log entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::verification_log::Model, DbErr> {
        entity::verification_log::ActiveModel {
            discord_id: ActiveValue::Set(self.discord_id),
            discord_name: ActiveValue::Set(self.discord_name),
            external_username: ActiveValue::Set(self.external_username),
            external_id: ActiveValue::Set(self.external_id),
            method: ActiveValue::Set(self.method),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a verification log row with default values.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(Model)` - The created log entity
/// - `Err(DbErr)` - Database error during creation
pub async fn create_verification_log(
    db: &DatabaseConnection,
) -> Result<entity::verification_log::Model, DbErr> {
    VerificationLogFactory::new(db).build().await
}
