use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::server::{
    error::AppError,
    model::api::{
        ActorDto, CloseFinalizeDto, CloseReasonDto, CloseSatisfactionDto, CreateTicketDto,
        TicketActionDto, TicketDto,
    },
    model::ticket::{Actor, CloseReason, TicketKind},
    state::AppState,
};

/// Resolves the staff capability and builds the domain actor.
fn resolve_actor(state: &AppState, dto: ActorDto) -> Actor {
    let is_staff = state.config.is_staff(&dto.role_ids);
    dto.into_actor(is_staff)
}

/// POST /api/tickets - Create a ticket
///
/// Allocates the ticket row, creates the scoped channel and registers the
/// ticket Open. A store failure fails the whole request.
///
/// # Returns
/// - `201 Created`: TicketDto for the new ticket
/// - `400 Bad Request`: Unknown ticket kind
/// - `500 Internal Server Error`: Store or Discord failure
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(dto): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, AppError> {
    let kind = TicketKind::parse(&dto.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown ticket kind '{}'", dto.kind)))?;
    let actor = resolve_actor(&state, dto.actor);

    let ticket = state.tickets.create_ticket(&actor, kind, &dto.details).await?;

    Ok((StatusCode::CREATED, Json(TicketDto::from(ticket))))
}

/// GET /api/tickets/{id} - Look up a live ticket
///
/// # Returns
/// - `200 OK`: TicketDto
/// - `404 Not Found`: Never created, or already closed
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.tickets.get_ticket(id).await?;

    Ok((StatusCode::OK, Json(TicketDto::from(ticket))))
}

/// POST /api/tickets/{id}/claim - Claim a ticket for a staff actor
///
/// # Returns
/// - `200 OK`: TicketDto, now Claimed
/// - `403 Forbidden`: Actor is not staff
/// - `409 Conflict`: Already claimed
pub async fn claim(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<TicketActionDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = resolve_actor(&state, dto.actor);

    let ticket = state.tickets.claim(id, &actor).await?;

    Ok((StatusCode::OK, Json(TicketDto::from(ticket))))
}

/// POST /api/tickets/{id}/unclaim - Release a claimed ticket
///
/// # Returns
/// - `200 OK`: TicketDto, Open again
/// - `409 Conflict`: Not claimed
/// - `429 Too Many Requests`: Cooldown active for a non-claimant
pub async fn unclaim(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<TicketActionDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = resolve_actor(&state, dto.actor);

    let ticket = state.tickets.unclaim(id, &actor).await?;

    Ok((StatusCode::OK, Json(TicketDto::from(ticket))))
}

/// POST /api/tickets/{id}/close - Start the close workflow
///
/// # Returns
/// - `204 No Content`: Flow started
/// - `404 Not Found`: No live ticket
pub async fn begin_close(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(_dto): Json<TicketActionDto>,
) -> Result<impl IntoResponse, AppError> {
    state.tickets.begin_close(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tickets/{id}/close/satisfaction - Record the satisfaction rating
///
/// # Returns
/// - `204 No Content`: Rating recorded
/// - `409 Conflict`: Rating out of range
pub async fn close_satisfaction(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<CloseSatisfactionDto>,
) -> Result<impl IntoResponse, AppError> {
    state.tickets.close_satisfaction(id, dto.rating).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tickets/{id}/close/reason - Record the close reason
///
/// # Returns
/// - `204 No Content`: Reason recorded
/// - `400 Bad Request`: Unknown reason label
/// - `409 Conflict`: Satisfaction step skipped
pub async fn close_reason(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<CloseReasonDto>,
) -> Result<impl IntoResponse, AppError> {
    let reason = CloseReason::parse(&dto.reason)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown close reason '{}'", dto.reason)))?;

    state.tickets.close_reason(id, reason).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tickets/{id}/close/finalize - Finalize the close workflow
///
/// Persists the closure record, then seals the channel and removes the ticket
/// from the live registry.
///
/// # Returns
/// - `204 No Content`: Ticket closed
/// - `409 Conflict`: A step is still missing
/// - `500 Internal Server Error`: Record write failed (flow preserved)
pub async fn finalize_close(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<CloseFinalizeDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = resolve_actor(&state, dto.actor);

    state.tickets.finalize_close(id, &actor, dto.comment).await?;

    Ok(StatusCode::NO_CONTENT)
}
