//! Claim cooldown ledger.
//!
//! Records when each ticket channel was last claimed and answers how much of
//! the unclaim cooldown window remains. Timestamps are process-local wall
//! clock only; a restart forgets them, which matches the registry's own
//! lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Per-channel record of the most recent claim, with the cooldown window
/// applied on read.
#[derive(Clone)]
pub struct ClaimLedger {
    last_claim_at: Arc<RwLock<HashMap<u64, Instant>>>,
    window: Duration,
}

impl ClaimLedger {
    /// Creates a ledger with the given cooldown window.
    pub fn new(window: Duration) -> Self {
        Self {
            last_claim_at: Arc::new(RwLock::new(HashMap::new())),
            window,
        }
    }

    /// Records a claim on the channel at the current instant.
    pub async fn record(&self, channel_id: u64) {
        self.last_claim_at
            .write()
            .await
            .insert(channel_id, Instant::now());
    }

    /// Remaining cooldown for the channel.
    ///
    /// # Returns
    /// - `Some(Duration)` - Time left before an unclaim is allowed
    /// - `None` - No claim recorded, or the window has fully elapsed
    pub async fn cooldown_remaining(&self, channel_id: u64) -> Option<Duration> {
        let last = *self.last_claim_at.read().await.get(&channel_id)?;
        let elapsed = Instant::now().saturating_duration_since(last);

        if elapsed < self.window {
            Some(self.window - elapsed)
        } else {
            None
        }
    }

    /// Clears the claim record for a channel.
    pub async fn clear(&self, channel_id: u64) {
        self.last_claim_at.write().await.remove(&channel_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    /// Tests that the full window is reported right after a claim.
    ///
    /// Expected: Ok with remaining equal to the window
    #[tokio::test(start_paused = true)]
    async fn reports_full_window_after_claim() {
        let ledger = ClaimLedger::new(Duration::from_secs(600));
        ledger.record(7).await;

        assert_eq!(
            ledger.cooldown_remaining(7).await,
            Some(Duration::from_secs(600))
        );
    }

    /// Tests that the remaining cooldown shrinks as time passes and reaches
    /// None once the window elapses.
    ///
    /// Expected: Ok with remaining shrinking to None at the window boundary
    #[tokio::test(start_paused = true)]
    async fn cooldown_elapses_with_time() {
        let ledger = ClaimLedger::new(Duration::from_secs(600));
        ledger.record(7).await;

        advance(Duration::from_secs(540)).await;
        assert_eq!(
            ledger.cooldown_remaining(7).await,
            Some(Duration::from_secs(60))
        );

        advance(Duration::from_secs(60)).await;
        assert_eq!(ledger.cooldown_remaining(7).await, None);
    }

    /// Tests that channels with no recorded claim have no cooldown.
    ///
    /// Expected: None
    #[tokio::test(start_paused = true)]
    async fn unknown_channel_has_no_cooldown() {
        let ledger = ClaimLedger::new(Duration::from_secs(600));

        assert_eq!(ledger.cooldown_remaining(7).await, None);
    }

    /// Tests that clearing removes the cooldown immediately.
    ///
    /// Expected: None right after clear, inside the window
    #[tokio::test(start_paused = true)]
    async fn clear_removes_cooldown() {
        let ledger = ClaimLedger::new(Duration::from_secs(600));
        ledger.record(7).await;
        ledger.clear(7).await;

        assert_eq!(ledger.cooldown_remaining(7).await, None);
    }

    /// Tests that a fresh claim restarts the window.
    ///
    /// Expected: Ok with remaining reset to the full window
    #[tokio::test(start_paused = true)]
    async fn reclaim_restarts_window() {
        let ledger = ClaimLedger::new(Duration::from_secs(600));
        ledger.record(7).await;

        advance(Duration::from_secs(500)).await;
        ledger.record(7).await;

        assert_eq!(
            ledger.cooldown_remaining(7).await,
            Some(Duration::from_secs(600))
        );
    }
}
