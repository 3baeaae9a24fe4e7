//! Countdown Pad - A keypad-driven countdown timer
//!
//! This is the main entry point for the countdown-pad server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_pad::{
    api::create_router,
    config::Config,
    state::{AppState, TracingObserver},
    tasks::spawn_countdown_ticker,
    utils::shutdown_signal,
    VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_pad={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-pad server v{}", VERSION);
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create the timer session
    let state = Arc::new(AppState::new(config.port, config.host.clone()));
    state.add_observer(Arc::new(TracingObserver))?;

    // Start the countdown ticker background task
    let ticker = spawn_countdown_ticker(Arc::clone(&state));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /digit/:d  - Append a digit (0-9)");
    info!("  POST /backspace - Drop the last digit");
    info!("  POST /clear     - Clear the input");
    info!("  POST /toggle    - Start, pause or resume");
    info!("  POST /stop      - Stop and clear");
    info!("  GET  /status    - Current timer and session status");
    info!("  GET  /events    - Server-sent timer updates");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.end_session()?;
    ticker.abort();

    info!("Server shutdown complete");
    Ok(())
}
