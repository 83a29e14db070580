// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::activity_log::ActivityLog;
use crate::application::fleet_service::FleetService;
use crate::application::report_service::ReportService;
use crate::domain::period::Period;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::gemini_client::GeminiClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_activity, close_editor, download_csv, download_snapshot, edit_reading, generate_report,
    get_dashboard, health_check, list_activity, open_editor, select_period,
};

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/period", put(select_period))
        .route("/editor", post(open_editor).delete(close_editor))
        .route("/editor/readings", patch(edit_reading))
        .route("/export.csv", get(download_csv))
        .route("/snapshot.png", get(download_snapshot))
        .route("/report", post(generate_report))
        .route("/activity", get(list_activity).delete(clear_activity))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let period = Period::new(app_config.fleet.initial_month, app_config.fleet.initial_year)
        .context("Invalid initial period in configuration")?;

    if app_config.report.api_key.is_none() {
        tracing::warn!("No report API key configured; reports will use the fallback text");
    }

    // Create text service client (infrastructure layer)
    let generator = Arc::new(GeminiClient::new(&app_config.report)?);

    // Create services (application layer)
    let activity = ActivityLog::new(app_config.fleet.activity_capacity);
    let fleet_service = FleetService::new(period, activity.clone())?;
    let report_service = ReportService::new(generator, activity);

    // Create application state
    let state = Arc::new(AppState {
        fleet_service,
        report_service,
        snapshot_scale: app_config.snapshot.scale,
    });

    let router = build_router(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting fleet-pa-dashboard on {} ({})", addr, period.label());

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
