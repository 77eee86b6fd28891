//! Ticket repository for database operations.
//!
//! This module provides the `TicketRepository` for managing ticket rows in the store.
//! Row IDs are allocated by the database's auto-increment key, so concurrent ticket
//! creation can never hand out the same ID; the historical zero-padded numbering
//! survives only as a display format derived from the real ID.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::{
    error::AppError,
    model::ticket::{CloseRecordParam, NewTicketParam, StoredTicket},
};

/// Repository providing database operations for ticket rows.
///
/// This struct holds a reference to the database connection and provides methods
/// for creating, reading and updating ticket rows. Status changes flow through
/// the dedicated mark/record methods so every store mutation mirrors one
/// lifecycle transition.
pub struct TicketRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketRepository<'a> {
    /// Creates a new TicketRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `TicketRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the initial row for a new ticket and returns its allocated ID.
    ///
    /// The row starts in `Open` status with no channel; the channel is attached
    /// via `set_channel` once the resource exists.
    ///
    /// # Arguments
    /// - `param` - Owner identity and ticket kind
    ///
    /// # Returns
    /// - `Ok(i32)` - The store-allocated ticket ID
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: NewTicketParam) -> Result<i32, DbErr> {
        let entity = entity::ticket::ActiveModel {
            owner_discord_id: ActiveValue::Set(param.owner_id.to_string()),
            owner_name: ActiveValue::Set(param.owner_name),
            kind: ActiveValue::Set(param.kind.as_str().to_string()),
            status: ActiveValue::Set("Open".to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(entity.id)
    }

    /// Attaches the channel resource to a ticket row.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `channel_id` - Discord channel ID as u64
    ///
    /// # Returns
    /// - `Ok(())` - Row updated (or no matching row found)
    /// - `Err(DbErr)` - Database error during update
    pub async fn set_channel(&self, id: i32, channel_id: u64) -> Result<(), DbErr> {
        entity::prelude::Ticket::update_many()
            .filter(entity::ticket::Column::Id.eq(id))
            .col_expr(
                entity::ticket::Column::ChannelId,
                sea_orm::sea_query::Expr::value(channel_id.to_string()),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Mirrors a claim transition: status `Claimed` plus the claimant's
    /// identity and display name.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `claimant_id` - Discord ID of the claiming staff member
    /// - `claimant_name` - Display name of the claiming staff member
    ///
    /// # Returns
    /// - `Ok(())` - Row updated (or no matching row found)
    /// - `Err(DbErr)` - Database error during update
    pub async fn mark_claimed(
        &self,
        id: i32,
        claimant_id: u64,
        claimant_name: &str,
    ) -> Result<(), DbErr> {
        entity::prelude::Ticket::update_many()
            .filter(entity::ticket::Column::Id.eq(id))
            .col_expr(
                entity::ticket::Column::Status,
                sea_orm::sea_query::Expr::value("Claimed"),
            )
            .col_expr(
                entity::ticket::Column::ClaimedById,
                sea_orm::sea_query::Expr::value(claimant_id.to_string()),
            )
            .col_expr(
                entity::ticket::Column::ClaimedByName,
                sea_orm::sea_query::Expr::value(claimant_name),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Mirrors an unclaim transition: status back to `Open`, claimant cleared.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    ///
    /// # Returns
    /// - `Ok(())` - Row updated (or no matching row found)
    /// - `Err(DbErr)` - Database error during update
    pub async fn mark_open(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::Ticket::update_many()
            .filter(entity::ticket::Column::Id.eq(id))
            .col_expr(
                entity::ticket::Column::Status,
                sea_orm::sea_query::Expr::value("Open"),
            )
            .col_expr(
                entity::ticket::Column::ClaimedById,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .col_expr(
                entity::ticket::Column::ClaimedByName,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Writes the immutable closure record for a ticket.
    ///
    /// Sets status `Closed` together with the transcript, satisfaction rating,
    /// close reason, optional comment and close timestamp in one update. The
    /// close workflow calls this before tearing the channel down, so a failed
    /// write leaves the ticket claimable instead of losing the record.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `record` - The closure record to persist
    ///
    /// # Returns
    /// - `Ok(())` - Row updated (or no matching row found)
    /// - `Err(DbErr)` - Database error during update
    pub async fn record_close(&self, id: i32, record: &CloseRecordParam) -> Result<(), DbErr> {
        entity::prelude::Ticket::update_many()
            .filter(entity::ticket::Column::Id.eq(id))
            .col_expr(
                entity::ticket::Column::Status,
                sea_orm::sea_query::Expr::value("Closed"),
            )
            .col_expr(
                entity::ticket::Column::Satisfaction,
                sea_orm::sea_query::Expr::value(record.satisfaction as i32),
            )
            .col_expr(
                entity::ticket::Column::CloseReason,
                sea_orm::sea_query::Expr::value(record.reason.as_str()),
            )
            .col_expr(
                entity::ticket::Column::Comment,
                sea_orm::sea_query::Expr::value(record.comment.clone()),
            )
            .col_expr(
                entity::ticket::Column::Transcript,
                sea_orm::sea_query::Expr::value(record.transcript.clone()),
            )
            .col_expr(
                entity::ticket::Column::ClosedAt,
                sea_orm::sea_query::Expr::value(record.closed_at),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Finds a ticket row by its ID.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    ///
    /// # Returns
    /// - `Ok(Some(StoredTicket))` - Row found and converted
    /// - `Ok(None)` - No row with that ID
    /// - `Err(AppError)` - Database error or stored value failed to parse
    pub async fn find_by_id(&self, id: i32) -> Result<Option<StoredTicket>, AppError> {
        let entity = entity::prelude::Ticket::find_by_id(id).one(self.db).await?;

        entity.map(StoredTicket::from_entity).transpose()
    }
}
