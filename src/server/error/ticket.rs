use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::model::api::ErrorDto;

/// Errors produced by ticket lifecycle operations.
///
/// Every failure is reported to the caller as a typed rejection reason rather
/// than a fatal error; downstream side effects (channel renames, store mirrors)
/// that fail after a state transition are logged and never rolled back.
#[derive(Error, Debug)]
pub enum TicketError {
    /// No live ticket with the requested ID.
    ///
    /// Closed tickets are removed from the live registry, so a close followed
    /// by any further operation also lands here. Results in 404 Not Found.
    #[error("Ticket not found")]
    NotFound,

    /// Claim attempted on a ticket that already has a claimant.
    ///
    /// Results in 409 Conflict.
    #[error("Ticket is already claimed")]
    AlreadyClaimed,

    /// Unclaim attempted on a ticket that is not claimed.
    ///
    /// Results in 409 Conflict.
    #[error("Ticket is not claimed")]
    NotClaimed,

    /// The requested transition violates the lifecycle state machine.
    ///
    /// Covers terminal-state violations (Closed is final) and out-of-order
    /// close workflow steps. Results in 409 Conflict.
    #[error("Invalid ticket transition: {0}")]
    InvalidTransition(&'static str),

    /// A privileged action was attempted by a non-staff actor.
    ///
    /// Results in 403 Forbidden.
    #[error("Only staff members may perform this action")]
    PermissionDenied,

    /// Unclaim attempted inside the cooldown window by someone other than
    /// the claimant.
    ///
    /// Carries the remaining wait; the user-facing message rounds it up to
    /// whole minutes. Results in 429 Too Many Requests.
    #[error("Wait another {} minute(s) before unclaiming", .0.as_secs().div_ceil(60))]
    CooldownActive(Duration),
}

/// Rounds a remaining cooldown up to whole minutes for display.
///
/// A remaining duration of 1 second reads as "1 minute"; zero stays zero.
///
/// # Arguments
/// - `remaining` - Remaining cooldown duration
///
/// # Returns
/// - `u64` - Remaining whole minutes, rounded up
pub fn minutes_remaining(remaining: Duration) -> u64 {
    remaining.as_secs().div_ceil(60)
}

/// Converts ticket errors into HTTP responses.
///
/// The error display text doubles as the client-facing message; none of the
/// variants carry information that needs to be hidden from callers.
impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyClaimed | Self::NotClaimed | Self::InvalidTransition(_) => {
                StatusCode::CONFLICT
            }
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::CooldownActive(_) => StatusCode::TOO_MANY_REQUESTS,
        };

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
