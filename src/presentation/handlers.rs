// HTTP request handlers
use crate::application::activity_log::{ActivityEntry, ActivityLevel};
use crate::application::report_service::GeneratedReport;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::FleetError;
use crate::domain::fleet::{CellInput, EquipmentSeries};
use crate::infrastructure::csv_export::{csv_filename, export_csv};
use crate::infrastructure::http_response::{attachment_response, error_response};
use crate::infrastructure::snapshot::{png_filename, render_png};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub equipment_id: String,
    pub day_index: usize,
    pub value: CellInput,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, FleetError> {
    Ok(Json(state.fleet_service.dashboard().await?))
}

/// Switch month/year; regenerates the whole dataset
pub async fn select_period(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PeriodRequest>,
) -> Result<Json<Dashboard>, FleetError> {
    let dashboard = state
        .fleet_service
        .select_period(request.month, request.year)
        .await?;
    Ok(Json(dashboard))
}

pub async fn open_editor(State(state): State<Arc<AppState>>) -> Json<Vec<EquipmentSeries>> {
    Json(state.fleet_service.open_editor().await)
}

pub async fn edit_reading(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EditRequest>,
) -> Result<Json<EquipmentSeries>, FleetError> {
    let series = state
        .fleet_service
        .edit_reading(&request.equipment_id, request.day_index, &request.value)
        .await?;
    Ok(Json(series))
}

/// Close the editor; the working copy is always committed
pub async fn close_editor(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, FleetError> {
    Ok(Json(state.fleet_service.close_editor().await?))
}

pub async fn download_csv(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.fleet_service.snapshot().await;

    let csv = match export_csv(&snapshot.series) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::error!("CSV export failed: {:#}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "CSV export failed");
        }
    };

    let filename = csv_filename(snapshot.period);
    state
        .fleet_service
        .activity()
        .record(ActivityLevel::Success, format!("Exported {}", filename));

    match attachment_response(csv.into_bytes(), "text/csv; charset=utf-8", &filename) {
        Ok(response) => response.into_response(),
        Err(status) => status.into_response(),
    }
}

pub async fn download_snapshot(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.fleet_service.snapshot().await;
    let scale = state.snapshot_scale;
    let series = snapshot.series;

    let rendered = tokio::task::spawn_blocking(move || render_png(&series, scale)).await;
    let png = match rendered {
        Ok(Ok(png)) => png,
        Ok(Err(e)) => {
            tracing::error!("Snapshot capture failed: {:#}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Snapshot capture failed");
        }
        Err(e) => {
            tracing::error!("Snapshot task failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Snapshot capture failed");
        }
    };

    let filename = png_filename(snapshot.period);
    state
        .fleet_service
        .activity()
        .record(ActivityLevel::Success, format!("Captured {}", filename));

    match attachment_response(png, "image/png", &filename) {
        Ok(response) => response.into_response(),
        Err(status) => status.into_response(),
    }
}

/// Ask the text service for an analysis of the committed set
pub async fn generate_report(State(state): State<Arc<AppState>>) -> Json<GeneratedReport> {
    // Snapshot first so the lock is not held while the request is in flight
    let snapshot = state.fleet_service.snapshot().await;
    Json(state.report_service.analyze(&snapshot).await)
}

pub async fn list_activity(State(state): State<Arc<AppState>>) -> Json<Vec<ActivityEntry>> {
    Json(state.fleet_service.activity().entries())
}

pub async fn clear_activity(State(state): State<Arc<AppState>>) -> StatusCode {
    state.fleet_service.activity().clear();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::activity_log::ActivityLog;
    use crate::application::fleet_service::FleetService;
    use crate::application::report_generator::ReportGenerator;
    use crate::application::report_service::ReportService;
    use crate::domain::period::Period;
    use async_trait::async_trait;
    use axum::http::header;

    struct OfflineGenerator;

    #[async_trait]
    impl ReportGenerator for OfflineGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("offline")
        }
    }

    fn state() -> Arc<AppState> {
        let activity = ActivityLog::new(50);
        Arc::new(AppState {
            fleet_service: FleetService::new(Period::new(0, 2025).unwrap(), activity.clone()).unwrap(),
            report_service: ReportService::new(Arc::new(OfflineGenerator), activity),
            snapshot_scale: 1,
        })
    }

    #[tokio::test]
    async fn test_edit_flow_through_handlers() {
        let state = state();

        let Json(working) = open_editor(State(state.clone())).await;
        assert_eq!(working.len(), 5);

        let request = EditRequest {
            equipment_id: "dz".into(),
            day_index: 0,
            value: CellInput::Text("abc".into()),
        };
        let Json(series) = edit_reading(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(series.readings()[0].value, 0.0);

        let Json(dashboard) = close_editor(State(state.clone())).await.unwrap();
        assert_eq!(dashboard.equipment[2].series.readings()[0].value, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_period_is_bad_request() {
        let request = PeriodRequest { month: 12, year: 2025 };
        let err = select_period(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_without_session_is_conflict() {
        let request = EditRequest {
            equipment_id: "dt".into(),
            day_index: 0,
            value: CellInput::Number(95.0),
        };
        let err = edit_reading(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_csv_download_headers() {
        let state = state();
        let response = download_csv(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Fleet_Operational_Report_January_2025.csv\""
        );
        let logged = state
            .fleet_service
            .activity()
            .entries()
            .iter()
            .any(|e| e.message.contains("Fleet_Operational_Report_January_2025.csv"));
        assert!(logged);
    }

    #[tokio::test]
    async fn test_snapshot_download_headers() {
        let response = download_snapshot(State(state())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[tokio::test]
    async fn test_report_falls_back_when_offline() {
        let Json(report) = generate_report(State(state())).await;
        assert!(report.fallback);
        assert!(report.text.starts_with("Monthly analysis for January 2025 unavailable"));
    }

    #[tokio::test]
    async fn test_clear_activity() {
        let state = state();
        assert!(!list_activity(State(state.clone())).await.0.is_empty());
        assert_eq!(clear_activity(State(state.clone())).await, StatusCode::NO_CONTENT);
        assert!(list_activity(State(state)).await.0.is_empty());
    }
}
