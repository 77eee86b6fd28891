//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.

use std::sync::Arc;

use crate::server::{
    config::Config,
    service::{shop::ShopStatusService, ticket::TicketService, verify::VerificationService},
};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: the config is reference-counted and the
/// services share their state through `Arc` internally. The services own
/// their database handles, so the state carries no raw connection.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, including the staff role set used for the
    /// central privilege check.
    pub config: Arc<Config>,

    /// Ticket lifecycle service: registry, claim coordinator and close
    /// workflow.
    pub tickets: TicketService,

    /// Verification correlator.
    pub verifier: VerificationService,

    /// Shop status schedule and override.
    pub shop: ShopStatusService,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `config` - Application configuration
    /// - `tickets` - Ticket lifecycle service
    /// - `verifier` - Verification correlator
    /// - `shop` - Shop status service
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        config: Arc<Config>,
        tickets: TicketService,
        verifier: VerificationService,
        shop: ShopStatusService,
    ) -> Self {
        Self {
            config,
            tickets,
            verifier,
            shop,
        }
    }
}
