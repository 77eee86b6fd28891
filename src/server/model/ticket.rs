//! Ticket domain models and parameters.
//!
//! Provides the in-memory ticket representation used by the registry, plus the
//! parameter types handed to the ticket repository. The claimant is carried
//! inside the `Claimed` status variant, so "claimed_by is set iff status is
//! Claimed" holds by construction.

use chrono::{DateTime, Utc};

use crate::server::{error::AppError, util::parse::parse_u64_from_string};

/// Category of a ticket, chosen by the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Order,
    Report,
    Qna,
}

impl TicketKind {
    /// Stable lowercase label used in channel names, store rows and DTOs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Report => "report",
            Self::Qna => "qna",
        }
    }

    /// Parses a kind label; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "order" => Some(Self::Order),
            "report" => Some(Self::Report),
            "qna" => Some(Self::Qna),
            _ => None,
        }
    }
}

/// Lifecycle state of a ticket.
///
/// Closed is terminal: the registry rejects every transition out of it, and
/// closed tickets are removed from the live registry entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Claimed { by: u64 },
    Closed,
}

impl TicketStatus {
    /// Status label persisted to the ticket store.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Claimed { .. } => "Claimed",
            Self::Closed => "Closed",
        }
    }

    /// The current claimant, if any.
    pub fn claimed_by(&self) -> Option<u64> {
        match self {
            Self::Claimed { by } => Some(*by),
            _ => None,
        }
    }
}

/// An actor performing an operation, as resolved by the presentation layer.
///
/// `is_staff` is computed once from the configured staff roles
/// (`Config::is_staff`) before the actor reaches any service.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub is_staff: bool,
}

/// A live ticket held by the in-memory registry.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Store-allocated row ID; also the registry key.
    pub id: i32,
    /// Discord ID of the requesting actor.
    pub owner_id: u64,
    /// Display name of the requesting actor.
    pub owner_name: String,
    pub kind: TicketKind,
    pub status: TicketStatus,
    /// Channel resource associated with this ticket.
    pub channel_id: u64,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Zero-padded display form of the ticket ID (`"001"`).
    ///
    /// Kept for compatibility with the historical row-count numbering; the
    /// real identity is the store-allocated integer ID.
    pub fn display_id(&self) -> String {
        format_display_id(self.id)
    }

    /// Channel name matching the current lifecycle state, e.g.
    /// `order-001`, `claimed-order-001`, `closed-order-001`.
    pub fn channel_name(&self) -> String {
        let base = format!("{}-{}", self.kind.as_str(), self.display_id());
        match self.status {
            TicketStatus::Open => base,
            TicketStatus::Claimed { .. } => format!("claimed-{}", base),
            TicketStatus::Closed => format!("closed-{}", base),
        }
    }
}

/// Formats a store-allocated ticket ID for display.
pub fn format_display_id(id: i32) -> String {
    format!("{:03}", id)
}

/// Reason selected during the close workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Done,
    Cancelled,
    NotPossible,
    Other,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Cancelled => "cancel",
            Self::NotPossible => "not_possible",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "done" => Some(Self::Done),
            "cancel" => Some(Self::Cancelled),
            "not_possible" => Some(Self::NotPossible),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Parameters for inserting the initial ticket row.
#[derive(Debug, Clone)]
pub struct NewTicketParam {
    pub owner_id: u64,
    pub owner_name: String,
    pub kind: TicketKind,
}

/// Immutable closure record written when a close workflow finalizes.
#[derive(Debug, Clone)]
pub struct CloseRecordParam {
    pub satisfaction: u8,
    pub reason: CloseReason,
    pub comment: Option<String>,
    pub transcript: String,
    pub closed_at: DateTime<Utc>,
}

/// A ticket row as persisted in the store.
///
/// Unlike the live [`Ticket`], stored rows survive process restarts and keep
/// their closure record after the live registry entry is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTicket {
    pub id: i32,
    pub owner_id: u64,
    pub owner_name: String,
    pub kind: TicketKind,
    pub status: TicketStatus,
    pub channel_id: Option<u64>,
    pub claimed_by_name: Option<String>,
    pub satisfaction: Option<u8>,
    pub close_reason: Option<CloseReason>,
    pub comment: Option<String>,
    pub transcript: Option<String>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl StoredTicket {
    /// Converts an entity model to a stored-ticket domain model at the
    /// repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(StoredTicket)` - The converted domain model
    /// - `Err(AppError::InternalError)` - A stored ID or label failed to parse
    pub fn from_entity(entity: entity::ticket::Model) -> Result<Self, AppError> {
        let owner_id = parse_u64_from_string(entity.owner_discord_id)?;

        let kind = TicketKind::parse(&entity.kind).ok_or_else(|| {
            AppError::InternalError(format!("Unknown ticket kind '{}' in store", entity.kind))
        })?;

        let status = match entity.status.as_str() {
            "Open" => TicketStatus::Open,
            "Claimed" => {
                let claimant = entity.claimed_by_id.clone().ok_or_else(|| {
                    AppError::InternalError("Claimed ticket row has no claimant".to_string())
                })?;
                TicketStatus::Claimed {
                    by: parse_u64_from_string(claimant)?,
                }
            }
            "Closed" => TicketStatus::Closed,
            other => {
                return Err(AppError::InternalError(format!(
                    "Unknown ticket status '{}' in store",
                    other
                )))
            }
        };

        let channel_id = entity
            .channel_id
            .map(parse_u64_from_string)
            .transpose()?;

        let close_reason = entity
            .close_reason
            .as_deref()
            .map(|value| {
                CloseReason::parse(value).ok_or_else(|| {
                    AppError::InternalError(format!("Unknown close reason '{}' in store", value))
                })
            })
            .transpose()?;

        Ok(Self {
            id: entity.id,
            owner_id,
            owner_name: entity.owner_name,
            kind,
            status,
            channel_id,
            claimed_by_name: entity.claimed_by_name,
            satisfaction: entity.satisfaction.map(|v| v as u8),
            close_reason,
            comment: entity.comment,
            transcript: entity.transcript,
            created_at: entity.created_at,
            closed_at: entity.closed_at,
        })
    }
}
