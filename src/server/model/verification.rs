//! Verification domain models and parameters.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::server::{error::AppError, util::parse::parse_u64_from_string};

/// How an actor chose to prove their external identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMethod {
    /// Join a designated game place; confirmation arrives as a game-entry
    /// signal bearing the username.
    Game,
    /// Place a generated challenge phrase in the external profile
    /// description.
    Description,
    /// Authorize via the platform's OAuth flow; confirmation arrives from the
    /// web callback bearing the provider-asserted username.
    OAuth,
}

impl VerifyMethod {
    /// Lowercase label used in DTOs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Description => "description",
            Self::OAuth => "oauth",
        }
    }

    /// Human-readable label written to verification log rows.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Game => "Game Entry",
            Self::Description => "Description",
            Self::OAuth => "OAuth",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "game" => Some(Self::Game),
            "description" => Some(Self::Description),
            "oauth" => Some(Self::OAuth),
            _ => None,
        }
    }
}

/// A pending claim of external identity awaiting confirmation.
///
/// At most one attempt exists per actor; starting a new one supersedes the
/// previous attempt entirely. Expiry is carried as a deadline and checked both
/// at confirmation time and by the periodic sweep, so superseding an attempt
/// never leaves a stale timer behind.
#[derive(Debug, Clone)]
pub struct VerificationAttempt {
    pub actor_id: u64,
    pub actor_name: String,
    pub method: VerifyMethod,
    /// The claimed external identity, as typed by the user.
    pub external_username: String,
    /// Challenge phrase; present only for description attempts.
    pub phrase: Option<String>,
    /// True from the moment the attempt is registered. This is the flag the
    /// original data model called `verified` - it never meant "confirmed".
    pub registered: bool,
    /// True once a matching external signal has arrived.
    pub confirmed: bool,
    /// Registration order, used as the deterministic tie-break when several
    /// pending attempts share a username.
    pub seq: u64,
    pub started_at: Instant,
    pub deadline: Instant,
}

impl VerificationAttempt {
    /// Whether the attempt's expiry deadline has passed at `now`.
    ///
    /// The deadline itself counts as expired: a confirmation arriving exactly
    /// on the deadline is rejected, one arriving any amount earlier succeeds.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Whether the attempt can still be matched by an external signal.
    pub fn is_pending_at(&self, now: Instant) -> bool {
        self.registered && !self.confirmed && !self.is_expired_at(now)
    }
}

/// Parameters for appending a verification log row.
#[derive(Debug, Clone)]
pub struct NewVerificationLogParam {
    pub discord_id: u64,
    pub discord_name: String,
    pub external_username: String,
    /// Resolved external numeric ID; empty when the directory lookup failed.
    pub external_id: String,
    pub method: String,
}

/// A persisted verification log row.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRecord {
    pub discord_id: u64,
    pub discord_name: String,
    pub external_username: String,
    pub external_id: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(VerificationRecord)` - The converted domain model
    /// - `Err(AppError::InternalError)` - Stored Discord ID failed to parse
    pub fn from_entity(entity: entity::verification_log::Model) -> Result<Self, AppError> {
        Ok(Self {
            discord_id: parse_u64_from_string(entity.discord_id)?,
            discord_name: entity.discord_name,
            external_username: entity.external_username,
            external_id: entity.external_id,
            method: entity.method,
            created_at: entity.created_at,
        })
    }
}
