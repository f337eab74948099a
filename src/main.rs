//! guild-member-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use guild_member_gateway::app::build_app;
use guild_member_gateway::app_state::AppState;
use guild_member_gateway::config::GatewayConfig;
use guild_member_gateway::domain::{ChangeDetector, EventBus};
use guild_member_gateway::service::MemberUpdateService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(addr = %config.listen_addr, "starting guild-member-gateway");

    // Build domain layer
    let detector = ChangeDetector::new(config.avatar_cdn.clone());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer and application state
    let app_state = AppState::new(MemberUpdateService::new(detector, event_bus));

    let app = build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
