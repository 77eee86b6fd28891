use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::AppError,
    service::{
        discord::ChannelGateway,
        shop::{channel_name, ShopStatusService},
    },
    util::clock::shop_now,
};

/// Starts the shop status scheduler
///
/// This scheduler runs every minute, computes the effective shop status
/// (override first, weekly schedule otherwise) and renames the configured
/// voice channel when the name no longer matches.
///
/// # Arguments
/// - `shop`: Shop status service
/// - `gateway`: Channel gateway for the rename
/// - `channel_id`: Voice channel advertising the status
pub async fn start_scheduler(
    shop: ShopStatusService,
    gateway: Arc<dyn ChannelGateway>,
    channel_id: u64,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    // Schedule job to run every minute
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let shop = shop.clone();
        let gateway = gateway.clone();

        Box::pin(async move {
            if let Err(e) = refresh_channel(&shop, gateway.as_ref(), channel_id).await {
                tracing::error!("Error refreshing shop status channel: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Shop status scheduler started");

    Ok(())
}

/// Applies the effective status to the channel name, renaming only on change.
async fn refresh_channel(
    shop: &ShopStatusService,
    gateway: &dyn ChannelGateway,
    channel_id: u64,
) -> Result<(), AppError> {
    let status = shop.effective_status(shop_now()).await;
    let desired = channel_name(status);

    let current = gateway.channel_name(channel_id).await?;
    if current != desired {
        gateway.rename_channel(channel_id, &desired).await?;
        tracing::info!("Shop status channel renamed to {}", desired);
    }

    Ok(())
}
