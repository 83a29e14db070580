// Application state for HTTP handlers
use crate::application::fleet_service::FleetService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub fleet_service: FleetService,
    pub report_service: ReportService,
    /// Pixel multiplier for PNG snapshots
    pub snapshot_scale: u32,
}
