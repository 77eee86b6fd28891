use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::server::{
    error::AppError,
    model::api::{ShopOverrideDto, ShopStatusDto},
    service::shop::ShopStatus,
    state::AppState,
    util::clock::shop_now,
};

/// PUT /api/shop/override - Force the shop status
///
/// # Returns
/// - `200 OK`: ShopStatusDto with the now-effective status
/// - `400 Bad Request`: Unknown status label
pub async fn set_override(
    State(state): State<AppState>,
    Json(dto): Json<ShopOverrideDto>,
) -> Result<impl IntoResponse, AppError> {
    let status = ShopStatus::parse(&dto.status)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown shop status '{}'", dto.status)))?;

    state.shop.set_override(status).await;

    Ok((
        StatusCode::OK,
        Json(ShopStatusDto {
            status: status.as_str().to_string(),
            overridden: true,
        }),
    ))
}

/// DELETE /api/shop/override - Return to the scheduled status
///
/// # Returns
/// - `200 OK`: ShopStatusDto with the scheduled status now in effect
pub async fn clear_override(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.shop.clear_override().await;

    let status = state.shop.effective_status(shop_now()).await;

    Ok((
        StatusCode::OK,
        Json(ShopStatusDto {
            status: status.as_str().to_string(),
            overridden: false,
        }),
    ))
}
