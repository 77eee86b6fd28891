use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::AppError,
    service::{ticket::TicketService, verify::VerificationService},
};

/// Starts the expiry sweep scheduler
///
/// This scheduler runs every minute and removes:
/// - Verification attempts whose deadline passed without confirmation
/// - Close flows abandoned past their expiry window
///
/// Expiry is also enforced lazily at confirmation time; the sweep only keeps
/// the maps from accumulating dead entries.
///
/// # Arguments
/// - `verifier`: Verification correlator to sweep
/// - `tickets`: Ticket service whose close flows to sweep
pub async fn start_scheduler(
    verifier: VerificationService,
    tickets: TicketService,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    // Schedule job to run every minute
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let verifier = verifier.clone();
        let tickets = tickets.clone();

        Box::pin(async move {
            let expired_attempts = verifier.sweep_expired().await;
            if expired_attempts > 0 {
                tracing::info!("Expired {} verification attempt(s)", expired_attempts);
            }

            let stale_flows = tickets.sweep_stale_close_flows().await;
            if stale_flows > 0 {
                tracing::info!("Dropped {} abandoned close flow(s)", stale_flows);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Expiry sweep scheduler started");

    Ok(())
}
