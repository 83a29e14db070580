// Dashboard domain model
use super::error::FleetError;
use super::fleet::{fleet_average, EquipmentSeries, KPI_THRESHOLD};
use super::period::Period;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub period: Period,
    pub month_name: &'static str,
    pub fleet_average: f64,
    pub kpi_threshold: f64,
    pub last_updated: DateTime<Utc>,
    pub editing: bool,
    pub equipment: Vec<EquipmentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentSummary {
    #[serde(flatten)]
    pub series: EquipmentSeries,
    pub days_below_threshold: usize,
}

impl Dashboard {
    pub fn new(
        period: Period,
        series: Vec<EquipmentSeries>,
        last_updated: DateTime<Utc>,
        editing: bool,
    ) -> Result<Self, FleetError> {
        let fleet_average = fleet_average(&series)?;
        let equipment = series
            .into_iter()
            .map(|series| EquipmentSummary {
                days_below_threshold: series.below_threshold(KPI_THRESHOLD),
                series,
            })
            .collect();

        Ok(Self {
            title: format!("Fleet Operational Performance - {}", period.label()),
            period,
            month_name: period.month_name(),
            fleet_average,
            kpi_threshold: KPI_THRESHOLD,
            last_updated,
            editing,
            equipment,
        })
    }
}
