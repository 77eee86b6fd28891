//! HTTP request handlers.
//!
//! Controllers validate and convert DTOs, resolve the actor's staff
//! capability against the configured staff roles, call into the service
//! layer, and convert domain models back to DTOs.

pub mod shop;
pub mod ticket;
pub mod verify;

/// GET /api/health - Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
