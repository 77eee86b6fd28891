//! Verification log repository for database operations.
//!
//! Verification log rows are append-only: one row per confirmed verification,
//! recording who verified, the claimed external identity, the resolved
//! external ID and the method used. Rows are never updated or deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::verification::{NewVerificationLogParam, VerificationRecord},
};

/// Repository providing database operations for verification log rows.
pub struct VerificationLogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VerificationLogRepository<'a> {
    /// Creates a new VerificationLogRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `VerificationLogRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a verification log row.
    ///
    /// # Arguments
    /// - `param` - Identity pair and method to record
    ///
    /// # Returns
    /// - `Ok(())` - Row inserted
    /// - `Err(DbErr)` - Database error during insert
    pub async fn append(&self, param: NewVerificationLogParam) -> Result<(), DbErr> {
        entity::verification_log::ActiveModel {
            discord_id: ActiveValue::Set(param.discord_id.to_string()),
            discord_name: ActiveValue::Set(param.discord_name),
            external_username: ActiveValue::Set(param.external_username),
            external_id: ActiveValue::Set(param.external_id),
            method: ActiveValue::Set(param.method),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Gets all verification records for a Discord user, newest first.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user ID as u64
    ///
    /// # Returns
    /// - `Ok(Vec<VerificationRecord>)` - Records for the user (empty if none)
    /// - `Err(AppError)` - Database error or stored value failed to parse
    pub async fn find_by_discord_id(
        &self,
        discord_id: u64,
    ) -> Result<Vec<VerificationRecord>, AppError> {
        let entities = entity::prelude::VerificationLog::find()
            .filter(entity::verification_log::Column::DiscordId.eq(discord_id.to_string()))
            .order_by_desc(entity::verification_log::Column::Id)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(VerificationRecord::from_entity)
            .collect()
    }
}
