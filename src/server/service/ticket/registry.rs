//! In-memory ticket registry.
//!
//! The registry is the single source of truth for claim ownership and
//! lifecycle state while the process runs; the ticket store only mirrors it.
//! The backing map is never handed out - every mutation goes through a method
//! that validates the lifecycle state machine while holding the write lock,
//! with no await points between the status check and the flip. Two actors
//! racing to claim the same ticket therefore cannot both pass the Open check.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::server::{
    error::ticket::TicketError,
    model::ticket::{Ticket, TicketStatus},
};

/// Owned map of live tickets keyed by store-allocated ID.
#[derive(Clone)]
pub struct TicketRegistry {
    inner: Arc<RwLock<HashMap<i32, Ticket>>>,
}

impl TicketRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a freshly created ticket.
    pub async fn insert(&self, ticket: Ticket) {
        self.inner.write().await.insert(ticket.id, ticket);
    }

    /// Looks up a live ticket by ID.
    ///
    /// # Returns
    /// - `Some(Ticket)` - Snapshot of the ticket's current state
    /// - `None` - No live ticket with that ID (never created, or closed)
    pub async fn get(&self, id: i32) -> Option<Ticket> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Removes a ticket from the live registry.
    ///
    /// Called when a close finalizes; the persisted row survives.
    pub async fn remove(&self, id: i32) -> Option<Ticket> {
        self.inner.write().await.remove(&id)
    }

    /// Transitions a ticket's status, enforcing the lifecycle state machine.
    ///
    /// The check and the flip happen atomically under the write lock, which is
    /// what closes the read-then-commit race window: a concurrent transition
    /// sees the already-flipped state and is rejected.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `next` - Target status
    ///
    /// # Returns
    /// - `Ok(Ticket)` - Snapshot of the ticket after the transition
    /// - `Err(TicketError::NotFound)` - No live ticket with that ID
    /// - `Err(TicketError::AlreadyClaimed)` - Claim on a claimed ticket
    /// - `Err(TicketError::NotClaimed)` - Unclaim on an open ticket
    /// - `Err(TicketError::InvalidTransition)` - Any transition out of Closed
    pub async fn set_status(&self, id: i32, next: TicketStatus) -> Result<Ticket, TicketError> {
        let mut tickets = self.inner.write().await;
        let ticket = tickets.get_mut(&id).ok_or(TicketError::NotFound)?;

        match (ticket.status, next) {
            (TicketStatus::Closed, _) => {
                return Err(TicketError::InvalidTransition("ticket is closed"))
            }
            (TicketStatus::Claimed { .. }, TicketStatus::Claimed { .. }) => {
                return Err(TicketError::AlreadyClaimed)
            }
            (TicketStatus::Open, TicketStatus::Open) => return Err(TicketError::NotClaimed),
            _ => {}
        }

        ticket.status = next;
        Ok(ticket.clone())
    }

    /// Finds the live ticket associated with a channel, if any.
    pub async fn find_by_channel(&self, channel_id: u64) -> Option<Ticket> {
        self.inner
            .read()
            .await
            .values()
            .find(|ticket| ticket.channel_id == channel_id)
            .cloned()
    }

}

impl Default for TicketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
