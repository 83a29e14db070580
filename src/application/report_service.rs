// Report service - Use case for the natural-language fleet summary
use crate::application::activity_log::{ActivityLevel, ActivityLog};
use crate::application::fleet_service::FleetSnapshot;
use crate::application::report_generator::ReportGenerator;
use crate::domain::fleet::EquipmentSeries;
use crate::domain::period::Period;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub month: &'static str,
    pub year: i32,
    pub text: String,
    /// True when the text service failed and `text` is the placeholder.
    pub fallback: bool,
}

#[derive(Clone)]
pub struct ReportService {
    generator: Arc<dyn ReportGenerator>,
    activity: ActivityLog,
}

impl ReportService {
    pub fn new(generator: Arc<dyn ReportGenerator>, activity: ActivityLog) -> Self {
        Self { generator, activity }
    }

    /// Never fails: any error from the text service becomes placeholder text.
    pub async fn analyze(&self, snapshot: &FleetSnapshot) -> GeneratedReport {
        let period = snapshot.period;
        let prompt = build_prompt(&snapshot.series, period);

        self.activity.record(
            ActivityLevel::AiCore,
            format!("Requesting fleet analysis for {}", period.label()),
        );

        let (text, fallback) = match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                self.activity
                    .record(ActivityLevel::Success, "Fleet analysis received");
                (text, false)
            }
            Ok(_) => {
                self.activity
                    .record(ActivityLevel::Warn, "Fleet analysis came back empty");
                (unavailable_message(period), true)
            }
            Err(e) => {
                tracing::warn!("Report generation error: {:#}", e);
                self.activity
                    .record(ActivityLevel::Warn, "Fleet analysis unavailable");
                (unavailable_message(period), true)
            }
        };

        GeneratedReport {
            month: period.month_name(),
            year: period.year(),
            text,
            fallback,
        }
    }
}

pub fn unavailable_message(period: Period) -> String {
    format!(
        "Monthly analysis for {} {} unavailable at this time. Please check your connection.",
        period.month_name(),
        period.year()
    )
}

/// One line per equipment: "Name (CODE): [1 Jan: 92.4%, ...] - Monthly Average: 88%"
pub fn summarize(series: &[EquipmentSeries]) -> String {
    series
        .iter()
        .map(|s| {
            let values = s
                .readings()
                .iter()
                .map(|r| format!("{}: {}%", r.label, r.value))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} ({}): [{}] - Monthly Average: {}%", s.name, s.code, values, s.avg())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(series: &[EquipmentSeries], period: Period) -> String {
    let month = period.month_name();
    let year = period.year();
    let summary = summarize(series);

    format!(
        "Analyze this mining fleet Monthly Physical Availability (PA%) data for {month} {year}:
{summary}

Provide a high-level Operational Insight Report. Use the following structure:
### 1. EXECUTIVE SUMMARY
A brief overview of the fleet's health for {month}.

### 2. CRITICAL ANOMALIES & RED FLAGS
Identify specific units or dates where performance dipped below 80% and explain potential causes.

### 3. MAINTENANCE PRIORITIZATION
Rank units that need immediate technical attention based on their trend lines.

### 4. STRATEGIC RECOMMENDATIONS
Actionable steps for the next 30 days after {month}.

Keep the tone professional, authoritative, and concise. Use bolding for key metrics."
    )
}
