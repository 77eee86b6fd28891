//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating repository calls and external collaborators
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//!
//! The external collaborators (Discord channel management, the identity
//! directory) sit behind traits so the lifecycle and correlation logic can be
//! exercised without the network.

pub mod directory;
pub mod discord;
pub mod shop;
pub mod ticket;
pub mod verify;
