//! Multi-step close workflow.
//!
//! Closing a ticket is a short interaction sequence - satisfaction rating,
//! close reason, optional comment - that must happen in order and ends in one
//! immutable closure record. In-progress flows are keyed by the ticket's
//! channel and expire like verification attempts do, so an abandoned close
//! cannot park a ticket in limbo forever.
//!
//! Finalization is persist-first: the closure record (including the full
//! channel transcript) is written to the store before the channel is sealed or
//! renamed. If the write fails the flow is restored and the ticket stays
//! claimable.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::server::{
    data::ticket::TicketRepository,
    error::{ticket::TicketError, AppError},
    model::ticket::{Actor, CloseReason, CloseRecordParam, TicketStatus},
    service::discord::TranscriptLine,
    service::ticket::TicketService,
    util::clock::to_shop_local,
};

/// Accumulated state of one in-progress close.
#[derive(Debug, Clone)]
struct CloseFlow {
    ticket_id: i32,
    satisfaction: Option<u8>,
    reason: Option<CloseReason>,
    deadline: Instant,
}

/// In-progress close flows keyed by channel ID.
///
/// Expired flows are treated as absent by every accessor and physically
/// removed by the periodic sweep.
#[derive(Clone)]
pub struct CloseFlowTracker {
    flows: Arc<RwLock<HashMap<u64, CloseFlow>>>,
    ttl: Duration,
}

impl CloseFlowTracker {
    /// Creates a tracker whose flows expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            flows: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts (or restarts) a close flow for a channel.
    ///
    /// Restarting replaces any previous progress and resets the deadline.
    pub async fn begin(&self, channel_id: u64, ticket_id: i32) {
        self.flows.write().await.insert(
            channel_id,
            CloseFlow {
                ticket_id,
                satisfaction: None,
                reason: None,
                deadline: Instant::now() + self.ttl,
            },
        );
    }

    /// Records the satisfaction rating, the first step of the sequence.
    ///
    /// # Arguments
    /// - `channel_id` - Channel whose flow to update
    /// - `rating` - Satisfaction rating, 1 to 5
    ///
    /// # Returns
    /// - `Ok(())` - Rating recorded
    /// - `Err(TicketError::NotFound)` - No live flow for the channel
    /// - `Err(TicketError::InvalidTransition)` - Rating out of range
    pub async fn set_satisfaction(&self, channel_id: u64, rating: u8) -> Result<(), TicketError> {
        if !(1..=5).contains(&rating) {
            return Err(TicketError::InvalidTransition(
                "satisfaction rating must be between 1 and 5",
            ));
        }

        let mut flows = self.flows.write().await;
        let flow = live_flow(&mut flows, channel_id)?;
        flow.satisfaction = Some(rating);
        Ok(())
    }

    /// Records the close reason, the second step of the sequence.
    ///
    /// # Returns
    /// - `Ok(())` - Reason recorded
    /// - `Err(TicketError::NotFound)` - No live flow for the channel
    /// - `Err(TicketError::InvalidTransition)` - Satisfaction step skipped
    pub async fn set_reason(&self, channel_id: u64, reason: CloseReason) -> Result<(), TicketError> {
        let mut flows = self.flows.write().await;
        let flow = live_flow(&mut flows, channel_id)?;

        if flow.satisfaction.is_none() {
            return Err(TicketError::InvalidTransition(
                "satisfaction rating not selected yet",
            ));
        }

        flow.reason = Some(reason);
        Ok(())
    }

    /// Takes a fully populated flow out of the tracker for finalization.
    ///
    /// Removal is atomic, so two concurrent finalizations cannot both proceed;
    /// the loser sees NotFound. Call [`restore`](Self::restore) if the close
    /// cannot be completed after all.
    ///
    /// # Returns
    /// - `Ok((ticket_id, satisfaction, reason))` - The accumulated steps
    /// - `Err(TicketError::NotFound)` - No live flow for the channel
    /// - `Err(TicketError::InvalidTransition)` - A step is still missing
    pub async fn take_ready(
        &self,
        channel_id: u64,
    ) -> Result<(i32, u8, CloseReason), TicketError> {
        let mut flows = self.flows.write().await;
        let flow = live_flow(&mut flows, channel_id)?;

        let satisfaction = flow.satisfaction.ok_or(TicketError::InvalidTransition(
            "satisfaction rating not selected yet",
        ))?;
        let reason = flow
            .reason
            .ok_or(TicketError::InvalidTransition("close reason not selected yet"))?;
        let ticket_id = flow.ticket_id;

        flows.remove(&channel_id);
        Ok((ticket_id, satisfaction, reason))
    }

    /// Puts a taken flow back after a failed finalization.
    ///
    /// The deadline restarts, giving the caller the full window to retry.
    pub async fn restore(
        &self,
        channel_id: u64,
        ticket_id: i32,
        satisfaction: u8,
        reason: CloseReason,
    ) {
        self.flows.write().await.insert(
            channel_id,
            CloseFlow {
                ticket_id,
                satisfaction: Some(satisfaction),
                reason: Some(reason),
                deadline: Instant::now() + self.ttl,
            },
        );
    }

    /// Removes expired flows.
    ///
    /// # Returns
    /// - `usize` - Number of flows removed
    pub async fn sweep_expired(&self) -> usize {
        let mut flows = self.flows.write().await;
        let now = Instant::now();
        let before = flows.len();
        flows.retain(|_, flow| now < flow.deadline);
        before - flows.len()
    }
}

/// Looks up the live flow for a channel, dropping it if expired.
fn live_flow<'a>(
    flows: &'a mut HashMap<u64, CloseFlow>,
    channel_id: u64,
) -> Result<&'a mut CloseFlow, TicketError> {
    let expired = flows
        .get(&channel_id)
        .map(|flow| Instant::now() >= flow.deadline)
        .unwrap_or(false);

    if expired {
        flows.remove(&channel_id);
    }

    flows.get_mut(&channel_id).ok_or(TicketError::NotFound)
}

/// Formats a channel history into the stored transcript: oldest first, one
/// line per message, stamped with the shop-local timestamp and author.
pub fn format_transcript(lines: &[TranscriptLine]) -> String {
    let mut ordered: Vec<&TranscriptLine> = lines.iter().collect();
    ordered.sort_by_key(|line| line.at);

    ordered
        .iter()
        .map(|line| {
            format!(
                "[{}] {}: {}",
                to_shop_local(line.at).format("%Y-%m-%d %H:%M"),
                line.author,
                line.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl TicketService {
    /// Starts the close workflow for a ticket.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    ///
    /// # Returns
    /// - `Ok(())` - Flow started (restarting replaces prior progress)
    /// - `Err(TicketError::NotFound)` - No live ticket with that ID
    pub async fn begin_close(&self, id: i32) -> Result<(), TicketError> {
        let ticket = self.registry.get(id).await.ok_or(TicketError::NotFound)?;
        self.close_flows.begin(ticket.channel_id, id).await;
        Ok(())
    }

    /// Records the satisfaction rating for a ticket's close flow.
    pub async fn close_satisfaction(&self, id: i32, rating: u8) -> Result<(), TicketError> {
        let ticket = self.registry.get(id).await.ok_or(TicketError::NotFound)?;
        self.close_flows
            .set_satisfaction(ticket.channel_id, rating)
            .await
    }

    /// Records the close reason for a ticket's close flow.
    pub async fn close_reason(&self, id: i32, reason: CloseReason) -> Result<(), TicketError> {
        let ticket = self.registry.get(id).await.ok_or(TicketError::NotFound)?;
        self.close_flows.set_reason(ticket.channel_id, reason).await
    }

    /// Finalizes the close workflow: collects the transcript, persists the
    /// closure record, and only then tears the channel down and removes the
    /// ticket from the live registry.
    ///
    /// # Arguments
    /// - `id` - Ticket ID
    /// - `actor` - The actor completing the close (recorded in the log line)
    /// - `comment` - Optional free-text comment
    ///
    /// # Returns
    /// - `Ok(())` - Record persisted, ticket closed and deregistered
    /// - `Err(TicketError::NotFound)` - No live ticket or no live flow
    /// - `Err(TicketError::InvalidTransition)` - A step is still missing
    /// - `Err(AppError::DbErr)` - Record write failed; the flow is restored
    ///   and the ticket stays in its current state
    pub async fn finalize_close(
        &self,
        id: i32,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<(), AppError> {
        let ticket = self.registry.get(id).await.ok_or(TicketError::NotFound)?;
        let (flow_ticket_id, satisfaction, reason) =
            self.close_flows.take_ready(ticket.channel_id).await?;

        let lines = match self.gateway.fetch_transcript(ticket.channel_id).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!("Failed to collect transcript for ticket {}: {}", id, e);
                Vec::new()
            }
        };

        let record = CloseRecordParam {
            satisfaction,
            reason,
            comment: comment.clone(),
            transcript: format_transcript(&lines),
            closed_at: Utc::now(),
        };

        if let Err(e) = TicketRepository::new(&self.db).record_close(id, &record).await {
            self.close_flows
                .restore(ticket.channel_id, flow_ticket_id, satisfaction, reason)
                .await;
            return Err(e.into());
        }

        let closed = self.registry.set_status(id, TicketStatus::Closed).await?;
        self.registry.remove(id).await;
        self.claims.clear(ticket.channel_id).await;

        if let Err(e) = self.gateway.seal_channel(ticket.channel_id).await {
            tracing::error!("Failed to seal channel for closed ticket {}: {}", id, e);
        }
        if let Err(e) = self
            .gateway
            .rename_channel(ticket.channel_id, &closed.channel_name())
            .await
        {
            tracing::error!("Failed to rename channel for closed ticket {}: {}", id, e);
        }

        let log_line = format!(
            "Ticket closed: {}\nBy: {}\nReason: {}\nSatisfaction: {}\nComment: {}",
            closed.display_id(),
            actor.name,
            reason.as_str(),
            satisfaction,
            comment.unwrap_or_default()
        );
        if let Err(e) = self.gateway.log(&log_line).await {
            tracing::warn!("Failed to log ticket close {}: {}", id, e);
        }

        Ok(())
    }

    /// Removes expired close flows; called by the scheduler.
    ///
    /// # Returns
    /// - `usize` - Number of flows removed
    pub async fn sweep_stale_close_flows(&self) -> usize {
        self.close_flows.sweep_expired().await
    }
}
