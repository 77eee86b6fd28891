use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::server::{
    error::AppError,
    model::api::{
        AttemptDto, DescriptionCheckDto, GameEntryDto, StartAttemptDto, VerificationRecordDto,
    },
    model::verification::VerifyMethod,
    state::AppState,
};

/// POST /api/verify/attempts - Register a verification attempt
///
/// Supersedes any prior pending attempt for the actor. Description attempts
/// receive the challenge phrase in the response.
///
/// # Returns
/// - `201 Created`: AttemptDto with the phrase for description attempts
/// - `400 Bad Request`: Unknown verification method
pub async fn start_attempt(
    State(state): State<AppState>,
    Json(dto): Json<StartAttemptDto>,
) -> Result<impl IntoResponse, AppError> {
    let method = VerifyMethod::parse(&dto.method).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown verification method '{}'", dto.method))
    })?;

    // staff capability is irrelevant here; anyone may verify
    let actor = dto.actor.into_actor(false);
    let attempt = state
        .verifier
        .start_attempt(&actor, method, &dto.username)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(AttemptDto {
            method: attempt.method.as_str().to_string(),
            username: attempt.external_username,
            phrase: attempt.phrase,
            expires_in_secs: state.config.verify_expiry.as_secs(),
        }),
    ))
}

/// POST /api/verify/game-entry - External confirmation bearing a username
///
/// Invoked by the game server (or the OAuth callback relay) when the claimed
/// user shows up. Matches pending attempts case-insensitively.
///
/// # Returns
/// - `200 OK`: `{"success": true}` with the confirmed actor's ID
/// - `404 Not Found`: No matching pending attempt
pub async fn game_entry(
    State(state): State<AppState>,
    Json(dto): Json<GameEntryDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = state.verifier.confirm_by_username(&dto.username).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "actor_id": actor_id })),
    ))
}

/// POST /api/verify/description-check - Run the description check
///
/// Resolves the actor's claimed username, fetches their current profile
/// description from the identity directory and confirms the stored phrase
/// against it.
///
/// # Returns
/// - `200 OK`: `{"success": true}` with the verified username
/// - `404 Not Found`: No pending description attempt, or unknown username
/// - `400 Bad Request`: Phrase not present in the profile
pub async fn description_check(
    State(state): State<AppState>,
    Json(dto): Json<DescriptionCheckDto>,
) -> Result<impl IntoResponse, AppError> {
    let username = state.verifier.check_description(dto.actor_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "username": username })),
    ))
}

/// GET /api/verify/{discord_id} - Verification history for a user
///
/// # Returns
/// - `200 OK`: JSON array of VerificationRecordDto, newest first
pub async fn history(
    State(state): State<AppState>,
    Path(discord_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.verifier.history(discord_id).await?;

    let dtos: Vec<VerificationRecordDto> = records
        .into_iter()
        .map(VerificationRecordDto::from)
        .collect();

    Ok((StatusCode::OK, Json(dtos)))
}
