// Fleet service - Owns the committed dataset and the editing session
use crate::application::activity_log::{ActivityLevel, ActivityLog};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::FleetError;
use crate::domain::fleet::{generate, CellInput, EquipmentSeries};
use crate::domain::period::Period;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct FleetState {
    period: Period,
    committed: Vec<EquipmentSeries>,
    /// Draft of `committed`, present only while an editing session is open.
    working: Option<Vec<EquipmentSeries>>,
    last_updated: DateTime<Utc>,
}

impl FleetState {
    fn commit_working_copy(&mut self) -> bool {
        match self.working.take() {
            Some(working) => {
                self.committed = working;
                self.last_updated = Utc::now();
                true
            }
            None => false,
        }
    }

    fn dashboard(&self) -> Result<Dashboard, FleetError> {
        Dashboard::new(
            self.period,
            self.committed.clone(),
            self.last_updated,
            self.working.is_some(),
        )
    }
}

/// Committed set plus its selected period, as handed to exporters.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub period: Period,
    pub series: Vec<EquipmentSeries>,
}

#[derive(Clone)]
pub struct FleetService {
    state: Arc<RwLock<FleetState>>,
    activity: ActivityLog,
}

impl FleetService {
    pub fn new(period: Period, activity: ActivityLog) -> Result<Self, FleetError> {
        let committed = generate(period.month(), period.year())?;
        activity.record(
            ActivityLevel::Info,
            format!("Generated fleet dataset for {}", period.label()),
        );

        Ok(Self {
            state: Arc::new(RwLock::new(FleetState {
                period,
                committed,
                working: None,
                last_updated: Utc::now(),
            })),
            activity,
        })
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub async fn dashboard(&self) -> Result<Dashboard, FleetError> {
        self.state.read().await.dashboard()
    }

    pub async fn snapshot(&self) -> FleetSnapshot {
        let state = self.state.read().await;
        FleetSnapshot {
            period: state.period,
            series: state.committed.clone(),
        }
    }

    /// Replace the committed set with freshly generated data for a new period.
    /// An open editing session is committed first, then overwritten.
    pub async fn select_period(&self, month: u32, year: i32) -> Result<Dashboard, FleetError> {
        let period = Period::new(month, year)?;
        let series = generate(period.month(), period.year())?;

        let mut state = self.state.write().await;
        if state.commit_working_copy() {
            self.activity
                .record(ActivityLevel::Warn, "Editor closed by period change; working copy committed");
        }
        state.period = period;
        state.committed = series;
        state.last_updated = Utc::now();

        self.activity.record(
            ActivityLevel::Info,
            format!("Generated fleet dataset for {}", period.label()),
        );
        state.dashboard()
    }

    /// Open an editing session. Re-opening returns the existing working copy.
    pub async fn open_editor(&self) -> Vec<EquipmentSeries> {
        let mut state = self.state.write().await;
        if let Some(working) = &state.working {
            return working.clone();
        }

        let working = state.committed.clone();
        state.working = Some(working.clone());
        self.activity.record(
            ActivityLevel::Info,
            format!("Editor opened for {}", state.period.label()),
        );
        working
    }

    /// Apply one cell edit to the working copy and return the updated series.
    pub async fn edit_reading(
        &self,
        equipment_id: &str,
        day_index: usize,
        input: &CellInput,
    ) -> Result<EquipmentSeries, FleetError> {
        let value = input.normalized();

        let mut state = self.state.write().await;
        let working = state.working.as_mut().ok_or(FleetError::NoEditSession)?;
        let series = working
            .iter_mut()
            .find(|s| s.id == equipment_id)
            .ok_or_else(|| FleetError::UnknownEquipment(equipment_id.to_string()))?;

        series.set_value(day_index, value)?;
        tracing::debug!(
            "Edited {} day {} -> {} (avg {})",
            equipment_id,
            day_index,
            value,
            series.avg()
        );
        Ok(series.clone())
    }

    /// Close the editing session. The working copy always replaces the
    /// committed set; there is no separate discard.
    pub async fn close_editor(&self) -> Result<Dashboard, FleetError> {
        let mut state = self.state.write().await;
        if state.commit_working_copy() {
            self.activity
                .record(ActivityLevel::Success, "Editor closed; working copy committed");
        }
        state.dashboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FleetService {
        FleetService::new(Period::new(0, 2025).unwrap(), ActivityLog::new(50)).unwrap()
    }

    #[tokio::test]
    async fn test_select_period_replaces_dataset() {
        let service = service();
        let dashboard = service.select_period(1, 2024).await.unwrap();

        assert_eq!(dashboard.period, Period::new(1, 2024).unwrap());
        assert!(dashboard.equipment.iter().all(|e| e.series.days() == 29));
        assert_eq!(dashboard.equipment[0].series.readings()[0].label, "1 Feb");
    }

    #[tokio::test]
    async fn test_select_period_rejects_invalid_month() {
        let service = service();
        let err = service.select_period(13, 2025).await.unwrap_err();
        assert_eq!(err, FleetError::InvalidMonth(13));
        assert_eq!(service.snapshot().await.period.month(), 0);
    }

    #[tokio::test]
    async fn test_edit_requires_session() {
        let service = service();
        let err = service
            .edit_reading("dt", 0, &CellInput::Number(90.0))
            .await
            .unwrap_err();
        assert_eq!(err, FleetError::NoEditSession);
    }

    #[tokio::test]
    async fn test_edits_stay_in_working_copy_until_close() {
        let service = service();
        let before = service.snapshot().await.series[1].clone();

        service.open_editor().await;
        let edited = service
            .edit_reading("wt", 0, &CellInput::Text("150".into()))
            .await
            .unwrap();
        assert_eq!(edited.readings()[0].value, 100.0);

        // Committed set is untouched while the session is open
        assert_eq!(service.snapshot().await.series[1], before);
        assert!(service.dashboard().await.unwrap().editing);

        let dashboard = service.close_editor().await.unwrap();
        assert!(!dashboard.editing);
        assert_eq!(dashboard.equipment[1].series, edited);
    }

    #[tokio::test]
    async fn test_edit_errors() {
        let service = service();
        service.open_editor().await;

        let unknown = service
            .edit_reading("crane", 0, &CellInput::Number(90.0))
            .await
            .unwrap_err();
        assert_eq!(unknown, FleetError::UnknownEquipment("crane".into()));

        let out_of_range = service
            .edit_reading("dt", 31, &CellInput::Number(90.0))
            .await
            .unwrap_err();
        assert_eq!(out_of_range, FleetError::DayOutOfRange { index: 31, days: 31 });
    }

    #[tokio::test]
    async fn test_reopen_keeps_existing_working_copy() {
        let service = service();
        service.open_editor().await;
        service
            .edit_reading("ex", 2, &CellInput::Text("-5".into()))
            .await
            .unwrap();

        let working = service.open_editor().await;
        assert_eq!(working[3].readings()[2].value, 0.0);
    }

    #[tokio::test]
    async fn test_period_change_commits_then_replaces_open_session() {
        let service = service();
        service.open_editor().await;
        service
            .edit_reading("gr", 0, &CellInput::Number(10.0))
            .await
            .unwrap();

        let dashboard = service.select_period(2, 2025).await.unwrap();
        assert!(!dashboard.editing);
        assert_eq!(dashboard.equipment[4].series.readings()[0].label, "1 Mar");
        assert_ne!(dashboard.equipment[4].series.readings()[0].value, 10.0);

        let warned = service
            .activity()
            .entries()
            .iter()
            .any(|e| e.level == ActivityLevel::Warn);
        assert!(warned);
    }

    #[tokio::test]
    async fn test_close_without_session_is_noop() {
        let service = service();
        let before = service.snapshot().await.series;
        let dashboard = service.close_editor().await.unwrap();
        assert_eq!(
            dashboard.equipment.into_iter().map(|e| e.series).collect::<Vec<_>>(),
            before
        );
    }
}
