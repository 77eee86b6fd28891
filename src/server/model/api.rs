//! Request and response DTOs for the HTTP API.
//!
//! Actor identity (ID, display name, Discord role IDs) rides in request
//! bodies; the controller resolves the staff capability against the
//! configured staff roles before anything reaches a service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::server::model::{
    ticket::{Actor, Ticket},
    verification::VerificationRecord,
};

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub error: String,
}

/// The acting user as reported by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorDto {
    pub id: u64,
    pub name: String,
    /// Discord role IDs the actor currently holds.
    #[serde(default)]
    pub role_ids: Vec<u64>,
}

impl ActorDto {
    /// Builds the domain actor with the staff capability already resolved.
    pub fn into_actor(self, is_staff: bool) -> Actor {
        Actor {
            id: self.id,
            name: self.name,
            is_staff,
        }
    }
}

/// Request body for creating a ticket.
#[derive(Debug, Deserialize)]
pub struct CreateTicketDto {
    pub actor: ActorDto,
    /// Ticket kind label: `order`, `report` or `qna`.
    pub kind: String,
    /// Free-text request details posted into the ticket channel.
    pub details: String,
}

/// Request body for actions that only need the acting user.
#[derive(Debug, Deserialize)]
pub struct TicketActionDto {
    pub actor: ActorDto,
}

/// Request body for the close workflow's satisfaction step.
#[derive(Debug, Deserialize)]
pub struct CloseSatisfactionDto {
    pub actor: ActorDto,
    /// Satisfaction rating, 1 to 5.
    pub rating: u8,
}

/// Request body for the close workflow's reason step.
#[derive(Debug, Deserialize)]
pub struct CloseReasonDto {
    pub actor: ActorDto,
    /// Close reason label: `done`, `cancel`, `not_possible` or `other`.
    pub reason: String,
}

/// Request body for finalizing a close workflow.
#[derive(Debug, Deserialize)]
pub struct CloseFinalizeDto {
    pub actor: ActorDto,
    /// Optional free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// A live ticket as returned by the API.
#[derive(Debug, Serialize)]
pub struct TicketDto {
    pub id: i32,
    pub display_id: String,
    pub owner_id: u64,
    pub owner_name: String,
    pub kind: String,
    pub status: String,
    pub claimed_by: Option<u64>,
    pub channel_id: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            display_id: ticket.display_id(),
            id: ticket.id,
            owner_id: ticket.owner_id,
            owner_name: ticket.owner_name,
            kind: ticket.kind.as_str().to_string(),
            status: ticket.status.label().to_string(),
            claimed_by: ticket.status.claimed_by(),
            channel_id: ticket.channel_id,
            created_at: ticket.created_at,
        }
    }
}

/// Request body for starting a verification attempt.
#[derive(Debug, Deserialize)]
pub struct StartAttemptDto {
    pub actor: ActorDto,
    /// Verification method label: `game`, `description` or `oauth`.
    pub method: String,
    /// Claimed external username.
    pub username: String,
}

/// A freshly registered verification attempt.
#[derive(Debug, Serialize)]
pub struct AttemptDto {
    pub method: String,
    pub username: String,
    /// Challenge phrase the user must place in their profile description;
    /// present only for description attempts.
    pub phrase: Option<String>,
    pub expires_in_secs: u64,
}

/// Request body for the game-entry confirmation endpoint.
#[derive(Debug, Deserialize)]
pub struct GameEntryDto {
    pub username: String,
}

/// Request body for running a description check.
#[derive(Debug, Deserialize)]
pub struct DescriptionCheckDto {
    pub actor_id: u64,
}

/// A persisted verification log row as returned by the API.
#[derive(Debug, Serialize)]
pub struct VerificationRecordDto {
    pub discord_id: u64,
    pub discord_name: String,
    pub external_username: String,
    pub external_id: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl From<VerificationRecord> for VerificationRecordDto {
    fn from(record: VerificationRecord) -> Self {
        Self {
            discord_id: record.discord_id,
            discord_name: record.discord_name,
            external_username: record.external_username,
            external_id: record.external_id,
            method: record.method,
            created_at: record.created_at,
        }
    }
}

/// Request body for setting the shop status override.
#[derive(Debug, Deserialize)]
pub struct ShopOverrideDto {
    /// `open` or `closed`.
    pub status: String,
}

/// Effective shop status as returned by the API.
#[derive(Debug, Serialize)]
pub struct ShopStatusDto {
    pub status: String,
    pub overridden: bool,
}
