mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    error::AppError,
    scheduler,
    service::{
        directory::{IdentityDirectory, RobloxDirectory},
        discord::{ChannelGateway, DiscordChannelGateway},
        shop::ShopStatusService,
        ticket::TicketService,
        verify::VerificationService,
    },
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let discord_http = startup::setup_discord_http(&config);

    let gateway: Arc<dyn ChannelGateway> =
        Arc::new(DiscordChannelGateway::new(discord_http, &config));
    let directory: Arc<dyn IdentityDirectory> = Arc::new(RobloxDirectory::new(
        http_client,
        config.roblox_api_url.clone(),
    ));

    let tickets = TicketService::new(
        db.clone(),
        gateway.clone(),
        config.claim_cooldown,
        config.close_flow_expiry,
    );
    let verifier = VerificationService::new(db, directory, config.verify_expiry);
    let shop = ShopStatusService::new();

    tracing::info!("Starting server");

    // Expiry sweeps for verification attempts and abandoned close flows
    let sweep_verifier = verifier.clone();
    let sweep_tickets = tickets.clone();
    tokio::spawn(async move {
        if let Err(e) = scheduler::expiry::start_scheduler(sweep_verifier, sweep_tickets).await {
            tracing::error!("Expiry scheduler error: {}", e);
        }
    });

    // Shop status voice channel renamer
    if let Some(channel_id) = config.shop_voice_channel_id {
        let shop_service = shop.clone();
        let shop_gateway = gateway.clone();
        tokio::spawn(async move {
            if let Err(e) =
                scheduler::shop_status::start_scheduler(shop_service, shop_gateway, channel_id)
                    .await
            {
                tracing::error!("Shop status scheduler error: {}", e);
            }
        });
    }

    let state = AppState::new(config.clone(), tickets, verifier, shop);
    let app = server::router::router()
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
