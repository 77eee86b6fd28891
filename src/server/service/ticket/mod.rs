//! Ticket lifecycle service.
//!
//! This module provides the `TicketService` for driving tickets through their
//! lifecycle. It orchestrates the in-memory registry (the source of truth),
//! the claim cooldown ledger, the close workflow tracker, the ticket store
//! mirror and the Discord channel gateway.
//!
//! The service is organized into separate modules by concern:
//! - `registry` - Live ticket map and state machine transitions
//! - `claim` - Claim cooldown ledger
//! - `close` - Multi-step close workflow and transcript assembly
//!
//! Failure semantics follow one rule throughout: the in-memory transition is
//! authoritative, and downstream side effects (channel rename, store mirror)
//! that fail afterwards are logged and never rolled back. The one exception is
//! the closure record, which is written before any teardown.

pub mod claim;
pub mod close;
pub mod registry;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::server::{
    data::ticket::TicketRepository,
    error::{ticket::TicketError, AppError},
    model::ticket::{format_display_id, Actor, NewTicketParam, Ticket, TicketKind, TicketStatus},
    service::discord::ChannelGateway,
    service::ticket::{claim::ClaimLedger, close::CloseFlowTracker, registry::TicketRegistry},
};

/// Service providing ticket lifecycle operations.
///
/// Cheap to clone: the registry, ledger and tracker share state through `Arc`,
/// and the database connection is a pooled handle.
#[derive(Clone)]
pub struct TicketService {
    db: DatabaseConnection,
    gateway: Arc<dyn ChannelGateway>,
    registry: TicketRegistry,
    claims: ClaimLedger,
    close_flows: CloseFlowTracker,
}

impl TicketService {
    /// Creates a new TicketService instance.
    ///
    /// # Arguments
    /// - `db` - Database connection for the ticket store mirror
    /// - `gateway` - Channel gateway for Discord side effects
    /// - `claim_cooldown` - Unclaim cooldown window
    /// - `close_flow_ttl` - Expiry window for abandoned close workflows
    ///
    /// # Returns
    /// - `TicketService` - New service instance
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn ChannelGateway>,
        claim_cooldown: Duration,
        close_flow_ttl: Duration,
    ) -> Self {
        Self {
            db,
            gateway,
            registry: TicketRegistry::new(),
            claims: ClaimLedger::new(claim_cooldown),
            close_flows: CloseFlowTracker::new(close_flow_ttl),
        }
    }

    /// Creates a new ticket for the requesting actor.
    ///
    /// The store row is written first so the ID is allocated atomically; if
    /// the store is unreachable the creation fails outright and is reported to
    /// the caller - it is not retried. The channel is then created scoped to
    /// the owner and staff, the ticket is registered Open, and the request
    /// details are posted into the channel.
    ///
    /// # Arguments
    /// - `actor` - The requesting actor
    /// - `kind` - Ticket category
    /// - `details` - Free-text request details
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The live ticket, registered Open
    /// - `Err(AppError)` - Store insert or channel creation failed
    pub async fn create_ticket(
        &self,
        actor: &Actor,
        kind: TicketKind,
        details: &str,
    ) -> Result<Ticket, AppError> {
        let repo = TicketRepository::new(&self.db);

        let id = repo
            .create(NewTicketParam {
                owner_id: actor.id,
                owner_name: actor.name.clone(),
                kind,
            })
            .await?;

        let name = format!("{}-{}", kind.as_str(), format_display_id(id));
        let channel_id = self.gateway.create_ticket_channel(&name, actor.id).await?;

        if let Err(e) = repo.set_channel(id, channel_id).await {
            tracing::error!("Failed to mirror channel for ticket {}: {}", id, e);
        }

        let ticket = Ticket {
            id,
            owner_id: actor.id,
            owner_name: actor.name.clone(),
            kind,
            status: TicketStatus::Open,
            channel_id,
            created_at: Utc::now(),
        };
        self.registry.insert(ticket.clone()).await;

        if let Err(e) = self.gateway.post_message(channel_id, details).await {
            tracing::warn!("Failed to post details into ticket {}: {}", id, e);
        }

        Ok(ticket)
    }

    /// Looks up a live ticket.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    ///
    /// # Returns
    /// - `Ok(Ticket)` - Snapshot of the live ticket
    /// - `Err(TicketError::NotFound)` - Never created, or already closed
    pub async fn get_ticket(&self, id: i32) -> Result<Ticket, TicketError> {
        self.registry.get(id).await.ok_or(TicketError::NotFound)
    }

    /// Claims a ticket for a staff actor.
    ///
    /// Succeeds only while the ticket is Open; the status flip and claimant
    /// assignment happen atomically in the registry, then the claim instant is
    /// recorded for the cooldown. The channel rename and store mirror follow
    /// and are logged on failure without rolling back.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `actor` - The claiming actor
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The ticket, now Claimed by the actor
    /// - `Err(TicketError::PermissionDenied)` - Actor is not staff
    /// - `Err(TicketError::AlreadyClaimed)` - Another claimant got there first
    /// - `Err(TicketError::NotFound)` - No live ticket with that ID
    pub async fn claim(&self, id: i32, actor: &Actor) -> Result<Ticket, AppError> {
        if !actor.is_staff {
            return Err(TicketError::PermissionDenied.into());
        }

        let ticket = self
            .registry
            .set_status(id, TicketStatus::Claimed { by: actor.id })
            .await?;
        self.claims.record(ticket.channel_id).await;

        if let Err(e) = self
            .gateway
            .rename_channel(ticket.channel_id, &ticket.channel_name())
            .await
        {
            tracing::error!("Failed to rename channel for claimed ticket {}: {}", id, e);
        }

        if let Err(e) = TicketRepository::new(&self.db)
            .mark_claimed(id, actor.id, &actor.name)
            .await
        {
            tracing::error!("Failed to mirror claim for ticket {}: {}", id, e);
        }

        Ok(ticket)
    }

    /// Releases a claimed ticket back to Open.
    ///
    /// The claimant may always unclaim their own ticket. Anyone else first
    /// runs into the cooldown window measured from the last claim, and beyond
    /// that must be staff.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `actor` - The actor requesting the unclaim
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The ticket, Open again with no claimant
    /// - `Err(TicketError::NotFound)` - No live ticket with that ID
    /// - `Err(TicketError::NotClaimed)` - Ticket has no claimant
    /// - `Err(TicketError::CooldownActive)` - Non-claimant inside the window
    /// - `Err(TicketError::PermissionDenied)` - Non-claimant, not staff
    pub async fn unclaim(&self, id: i32, actor: &Actor) -> Result<Ticket, AppError> {
        let current = self.registry.get(id).await.ok_or(TicketError::NotFound)?;
        let claimant = current.status.claimed_by().ok_or(TicketError::NotClaimed)?;

        // The claimant always bypasses the cooldown; other actors never do.
        if actor.id != claimant {
            if let Some(remaining) = self.claims.cooldown_remaining(current.channel_id).await {
                return Err(TicketError::CooldownActive(remaining).into());
            }
            if !actor.is_staff {
                return Err(TicketError::PermissionDenied.into());
            }
        }

        let ticket = self.registry.set_status(id, TicketStatus::Open).await?;
        self.claims.clear(ticket.channel_id).await;

        if let Err(e) = self
            .gateway
            .rename_channel(ticket.channel_id, &ticket.channel_name())
            .await
        {
            tracing::error!(
                "Failed to rename channel for unclaimed ticket {}: {}",
                id,
                e
            );
        }

        if let Err(e) = TicketRepository::new(&self.db).mark_open(id).await {
            tracing::error!("Failed to mirror unclaim for ticket {}: {}", id, e);
        }

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use test_utils::builder::TestBuilder;

    use crate::server::model::ticket::{CloseReason, StoredTicket};
    use crate::server::testing::RecordingGateway;

    fn staff(id: u64, name: &str) -> Actor {
        Actor {
            id,
            name: name.to_string(),
            is_staff: true,
        }
    }

    fn member(id: u64, name: &str) -> Actor {
        Actor {
            id,
            name: name.to_string(),
            is_staff: false,
        }
    }

    async fn service_with_cooldown(cooldown: Duration) -> (TicketService, Arc<RecordingGateway>) {
        let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
        let db = test.db.unwrap();
        let gateway = Arc::new(RecordingGateway::new());

        let service = TicketService::new(db, gateway.clone(), cooldown, Duration::from_secs(900));

        (service, gateway)
    }

    async fn service_with_gateway() -> (TicketService, Arc<RecordingGateway>) {
        service_with_cooldown(Duration::from_secs(600)).await
    }

    async fn stored(service: &TicketService, id: i32) -> StoredTicket {
        TicketRepository::new(&service.db)
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
    }

    /// End-to-end create scenario.
    ///
    /// Verifies that creating an order ticket allocates ID 1 (displayed as
    /// "001"), registers it Open for the owner, appends exactly one store row
    /// and posts the details into the new channel.
    ///
    /// Expected: Ok with display ID "001", Open status and one mirrored row
    #[tokio::test]
    async fn creates_ticket_with_store_row() {
        let (service, gateway) = service_with_gateway().await;
        let alice = member(11, "alice");

        let ticket = service
            .create_ticket(&alice, TicketKind::Order, "need a custom script")
            .await
            .unwrap();

        assert_eq!(ticket.display_id(), "001");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.owner_name, "alice");

        let row = stored(&service, ticket.id).await;
        assert_eq!(row.status, TicketStatus::Open);
        assert_eq!(row.owner_id, 11);
        assert_eq!(row.channel_id, Some(ticket.channel_id));

        let created = gateway.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].1, "order-001");

        let messages = gateway.messages.lock().unwrap();
        assert_eq!(
            messages[0],
            (ticket.channel_id, "need a custom script".to_string())
        );
    }

    /// Tests that a store failure fails the creation outright.
    ///
    /// Verifies that when the store insert cannot run (ticket table missing),
    /// the caller gets an error and no channel is created.
    ///
    /// Expected: Err with no channel side effects
    #[tokio::test]
    async fn create_fails_when_store_is_unreachable() {
        let test = TestBuilder::new().build().await.unwrap();
        let gateway = Arc::new(RecordingGateway::new());
        let service = TicketService::new(
            test.db.unwrap(),
            gateway.clone(),
            Duration::from_secs(600),
            Duration::from_secs(900),
        );

        let result = service
            .create_ticket(&member(11, "alice"), TicketKind::Order, "details")
            .await;

        assert!(result.is_err());
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    /// End-to-end claim/unclaim scenario.
    ///
    /// Staff actor Y claims the ticket; non-staff actor Z is rejected with the
    /// remaining cooldown when unclaiming inside the window; claimant Y
    /// unclaims successfully regardless of the cooldown.
    ///
    /// Expected: Claimed by Y, CooldownActive for Z, Open again after Y
    #[tokio::test]
    async fn claim_cooldown_and_claimant_override() {
        let (service, gateway) = service_with_gateway().await;
        let owner = member(11, "alice");
        let y = staff(42, "staff-y");
        let z = member(77, "member-z");

        let ticket = service
            .create_ticket(&owner, TicketKind::Order, "details")
            .await
            .unwrap();

        let claimed = service.claim(ticket.id, &y).await.unwrap();
        assert_eq!(claimed.status, TicketStatus::Claimed { by: 42 });

        let row = stored(&service, ticket.id).await;
        assert_eq!(row.status, TicketStatus::Claimed { by: 42 });
        assert_eq!(row.claimed_by_name.as_deref(), Some("staff-y"));

        // channel renamed to the claimed convention
        assert_eq!(
            gateway.renames.lock().unwrap().last().unwrap().1,
            "claimed-order-001"
        );

        // non-claimant inside the window: rejected with the remaining cooldown
        let denied = service.unclaim(ticket.id, &z).await;
        match denied {
            Err(AppError::TicketErr(TicketError::CooldownActive(remaining))) => {
                // the claim happened moments ago, so nearly the whole window
                // is left and the display rounding reports 10 minutes
                assert!(remaining > Duration::from_secs(590));
                assert!(remaining <= Duration::from_secs(600));
                assert_eq!(
                    crate::server::error::ticket::minutes_remaining(remaining),
                    10
                );
            }
            other => panic!("expected CooldownActive, got {:?}", other.map(|t| t.status)),
        }

        // the claimant bypasses the cooldown
        let reopened = service.unclaim(ticket.id, &y).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Open);
        assert_eq!(stored(&service, ticket.id).await.status, TicketStatus::Open);
        assert_eq!(
            gateway.renames.lock().unwrap().last().unwrap().1,
            "order-001"
        );
    }

    /// Tests that non-staff actors cannot claim.
    ///
    /// Expected: Err(PermissionDenied) and the ticket still Open
    #[tokio::test]
    async fn claim_requires_staff() {
        let (service, _gateway) = service_with_gateway().await;
        let owner = member(11, "alice");

        let ticket = service
            .create_ticket(&owner, TicketKind::Qna, "question")
            .await
            .unwrap();

        let result = service.claim(ticket.id, &member(12, "bob")).await;
        assert!(matches!(
            result,
            Err(AppError::TicketErr(TicketError::PermissionDenied))
        ));
        assert_eq!(
            service.get_ticket(ticket.id).await.unwrap().status,
            TicketStatus::Open
        );
    }

    /// Tests that a second claim is rejected while the first claimant holds
    /// the ticket.
    ///
    /// Expected: Err(AlreadyClaimed)
    #[tokio::test]
    async fn second_claim_is_rejected() {
        let (service, _gateway) = service_with_gateway().await;

        let ticket = service
            .create_ticket(&member(11, "alice"), TicketKind::Report, "report")
            .await
            .unwrap();

        service.claim(ticket.id, &staff(42, "staff-y")).await.unwrap();
        let result = service.claim(ticket.id, &staff(43, "staff-w")).await;

        assert!(matches!(
            result,
            Err(AppError::TicketErr(TicketError::AlreadyClaimed))
        ));
    }

    /// Tests that a staff non-claimant may unclaim once the cooldown expires.
    ///
    /// Uses a short window and waits past it.
    ///
    /// Expected: Ok after the window elapses
    #[tokio::test]
    async fn staff_unclaims_after_cooldown() {
        let (service, _gateway) = service_with_cooldown(Duration::from_millis(50)).await;

        let ticket = service
            .create_ticket(&member(11, "alice"), TicketKind::Order, "details")
            .await
            .unwrap();
        service.claim(ticket.id, &staff(42, "staff-y")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        let reopened = service.unclaim(ticket.id, &staff(43, "staff-w")).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Open);
    }

    /// Full close workflow scenario.
    ///
    /// Walks satisfaction -> reason -> finalize, then verifies the closure
    /// record (status, rating, reason, comment, transcript) in the store, the
    /// channel teardown, and that the ticket is gone from the live registry.
    ///
    /// Expected: Ok with persisted record and NotFound afterwards
    #[tokio::test]
    async fn close_workflow_persists_record_and_drops_ticket() {
        let (service, gateway) = service_with_gateway().await;
        let owner = member(11, "alice");
        let y = staff(42, "staff-y");

        let ticket = service
            .create_ticket(&owner, TicketKind::Order, "details")
            .await
            .unwrap();
        service.claim(ticket.id, &y).await.unwrap();

        service.begin_close(ticket.id).await.unwrap();
        service.close_satisfaction(ticket.id, 5).await.unwrap();
        service
            .close_reason(ticket.id, CloseReason::Done)
            .await
            .unwrap();
        service
            .finalize_close(ticket.id, &y, Some("all done".to_string()))
            .await
            .unwrap();

        let row = stored(&service, ticket.id).await;
        assert_eq!(row.status, TicketStatus::Closed);
        assert_eq!(row.satisfaction, Some(5));
        assert_eq!(row.close_reason, Some(CloseReason::Done));
        assert_eq!(row.comment.as_deref(), Some("all done"));
        assert!(row.transcript.is_some());
        assert!(row.closed_at.is_some());

        assert!(matches!(
            service.get_ticket(ticket.id).await,
            Err(TicketError::NotFound)
        ));
        assert_eq!(
            gateway.sealed.lock().unwrap().as_slice(),
            &[ticket.channel_id]
        );
        assert_eq!(
            gateway.renames.lock().unwrap().last().unwrap().1,
            "closed-order-001"
        );
    }

    /// Tests that a closed ticket cannot be closed again.
    ///
    /// Expected: Err(NotFound) - the ticket has left the live registry
    #[tokio::test]
    async fn close_is_not_repeatable() {
        let (service, _gateway) = service_with_gateway().await;
        let owner = member(11, "alice");

        let ticket = service
            .create_ticket(&owner, TicketKind::Order, "details")
            .await
            .unwrap();

        service.begin_close(ticket.id).await.unwrap();
        service.close_satisfaction(ticket.id, 3).await.unwrap();
        service
            .close_reason(ticket.id, CloseReason::Cancelled)
            .await
            .unwrap();
        service.finalize_close(ticket.id, &owner, None).await.unwrap();

        let result = service.begin_close(ticket.id).await;
        assert!(matches!(result, Err(TicketError::NotFound)));
    }
}
