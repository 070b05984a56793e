//! Pomodoro Timer - A drift-corrected countdown timer
//! 
//! This is the main entry point for the pomodoro-timer service.

use std::sync::Arc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::info;

use pomodoro_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{completion_alert_task, TokioScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, short={}min, long={}min, tick={}ms",
          config.host, config.port, config.work_minutes,
          config.short_break_minutes, config.long_break_minutes, config.tick_ms);

    // Create the timer session driven by the tokio tick scheduler
    let scheduler = Arc::new(TokioScheduler::new(Handle::current()));
    let state = AppState::new(
        config.timer_config(),
        config.tick_interval(),
        scheduler,
        config.host.clone(),
        config.port,
    );

    // Start the completion alert background task
    let alert_state = Arc::clone(&state);
    let alarm_command = config.alarm_command.clone();
    tokio::spawn(async move {
        completion_alert_task(alert_state, alarm_command).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start the timer (optional {{\"minutes\",\"seconds\"}} body)");
    info!("  POST /pause       - Pause the countdown");
    info!("  POST /resume      - Resume the countdown");
    info!("  POST /stop        - Stop and restore the mode's duration");
    info!("  POST /reset       - Stop and clear the custom duration");
    info!("  POST /mode/:mode  - Switch to work, short-break, long-break or custom");
    info!("  POST /mute        - Mute or unmute the alarm");
    info!("  GET  /status      - Current timer snapshot");
    info!("  GET  /health      - Health check");

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

    if let Err(e) = state.shutdown() {
        tracing::warn!("Failed to cancel timer ticks: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
