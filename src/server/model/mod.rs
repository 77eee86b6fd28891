//! Domain models and operation-specific parameter types.
//!
//! Domain models represent the core business objects (tickets, verification
//! attempts) independent of both the database entities and the API DTOs.
//! Conversions happen at the boundaries: `from_entity` at the repository layer
//! and `into_dto` at the controller layer.

pub mod api;
pub mod ticket;
pub mod verification;
