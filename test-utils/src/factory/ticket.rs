//! Ticket factory for creating test ticket rows.
//!
//! This module provides factory methods for creating ticket entities with sensible
//! defaults, reducing boilerplate in tests. The factory supports customization
//! through a builder pattern.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test tickets with customizable fields.
///
/// Provides a builder pattern for creating ticket entities with default values
/// that can be overridden as needed for specific test scenarios.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::ticket::TicketFactory;
///
/// let ticket = TicketFactory::new(&db)
///     .owner_name("alice")
///     .kind("report")
///     .status("Claimed")
///     .build()
///     .await?;
/// ```
pub struct TicketFactory<'a> {
    db: &'a DatabaseConnection,
    owner_discord_id: String,
    owner_name: String,
    kind: String,
    status: String,
    channel_id: Option<String>,
    claimed_by_id: Option<String>,
    claimed_by_name: Option<String>,
}

impl<'a> TicketFactory<'a> {
    /// Creates a new TicketFactory with default values.
    ///
    /// Defaults:
    /// - owner_discord_id: `"{id}"` where id is auto-incremented
    /// - owner_name: `"Owner {id}"`
    /// - kind: `"order"`
    /// - status: `"Open"`
    /// - channel_id / claimed_by: unset
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `TicketFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            owner_discord_id: format!("{}", 100_000 + id),
            owner_name: format!("Owner {}", id),
            kind: "order".to_string(),
            status: "Open".to_string(),
            channel_id: None,
            claimed_by_id: None,
            claimed_by_name: None,
        }
    }

    /// Sets the owner's Discord ID.
    pub fn owner_discord_id(mut self, owner_discord_id: impl Into<String>) -> Self {
        self.owner_discord_id = owner_discord_id.into();
        self
    }

    /// Sets the owner's display name.
    pub fn owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = owner_name.into();
        self
    }

    /// Sets the ticket kind (`"order"`, `"report"` or `"qna"`).
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the lifecycle status (`"Open"`, `"Claimed"` or `"Closed"`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the associated channel ID.
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Sets the claimant's ID and display name.
    pub fn claimed_by(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.claimed_by_id = Some(id.into());
        self.claimed_by_name = Some(name.into());
        self
    }

    /// Inserts the ticket row and returns the created entity.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted ticket entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::ticket::Model, DbErr> {
        entity::ticket::ActiveModel {
            owner_discord_id: ActiveValue::Set(self.owner_discord_id),
            owner_name: ActiveValue::Set(self.owner_name),
            kind: ActiveValue::Set(self.kind),
            status: ActiveValue::Set(self.status),
            channel_id: ActiveValue::Set(self.channel_id),
            claimed_by_id: ActiveValue::Set(self.claimed_by_id),
            claimed_by_name: ActiveValue::Set(self.claimed_by_name),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a ticket with default values.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(Model)` - The created ticket entity
/// - `Err(DbErr)` - Database error during creation
pub async fn create_ticket(db: &DatabaseConnection) -> Result<entity::ticket::Model, DbErr> {
    TicketFactory::new(db).build().await
}
