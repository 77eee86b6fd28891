//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let ticket = factory::ticket::create_ticket(&db).await?;
//!
//!     // Using builder pattern for customization
//!     let ticket = factory::ticket::TicketFactory::new(&db)
//!         .owner_name("alice")
//!         .kind("order")
//!         .status("Claimed")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod helpers;
pub mod ticket;
pub mod verification_log;

// Re-export commonly used factory functions for concise usage
pub use ticket::create_ticket;
pub use verification_log::create_verification_log;
