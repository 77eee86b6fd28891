use axum::{
    routing::{get, post, put},
    Router,
};

use crate::server::{
    controller::{health, shop, ticket, verify},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tickets", post(ticket::create_ticket))
        .route("/api/tickets/{id}", get(ticket::get_ticket))
        .route("/api/tickets/{id}/claim", post(ticket::claim))
        .route("/api/tickets/{id}/unclaim", post(ticket::unclaim))
        .route("/api/tickets/{id}/close", post(ticket::begin_close))
        .route(
            "/api/tickets/{id}/close/satisfaction",
            post(ticket::close_satisfaction),
        )
        .route("/api/tickets/{id}/close/reason", post(ticket::close_reason))
        .route(
            "/api/tickets/{id}/close/finalize",
            post(ticket::finalize_close),
        )
        .route("/api/verify/attempts", post(verify::start_attempt))
        .route("/api/verify/game-entry", post(verify::game_entry))
        .route(
            "/api/verify/description-check",
            post(verify::description_check),
        )
        .route("/api/verify/history/{discord_id}", get(verify::history))
        .route(
            "/api/shop/override",
            put(shop::set_override).delete(shop::clear_override),
        )
}
