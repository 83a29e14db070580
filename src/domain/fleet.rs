// Fleet availability series - generation and aggregation
use super::equipment::{EquipmentProfile, PROFILES};
use super::error::FleetError;
use super::period::Period;
use serde::{Deserialize, Serialize};

/// PA% target shown next to the fleet average.
pub const KPI_THRESHOLD: f64 = 98.0;

/// Generated values never drop below this, even though edits may go to 0.
const GENERATED_FLOOR: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReading {
    pub label: String,
    pub value: f64,
}

impl DailyReading {
    pub fn new(label: String, value: f64) -> Self {
        Self { label, value }
    }
}

/// One equipment's readings for a month. `avg` always tracks `readings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentSeries {
    pub id: &'static str,
    pub code: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    readings: Vec<DailyReading>,
    avg: f64,
}

impl EquipmentSeries {
    pub fn new(profile: &EquipmentProfile, readings: Vec<DailyReading>) -> Result<Self, FleetError> {
        let avg = average(&values_of(&readings))?;
        Ok(Self {
            id: profile.id,
            code: profile.code,
            name: profile.name,
            color: profile.color,
            readings,
            avg,
        })
    }

    pub fn readings(&self) -> &[DailyReading] {
        &self.readings
    }

    pub fn values(&self) -> Vec<f64> {
        values_of(&self.readings)
    }

    pub fn avg(&self) -> f64 {
        self.avg
    }

    /// Number of daily readings.
    pub fn days(&self) -> usize {
        self.readings.len()
    }

    pub fn below_threshold(&self, threshold: f64) -> usize {
        self.readings.iter().filter(|r| r.value < threshold).count()
    }

    /// Overwrite one day's value and recompute the average.
    pub fn set_value(&mut self, day_index: usize, value: f64) -> Result<&DailyReading, FleetError> {
        let days = self.readings.len();
        let reading = self
            .readings
            .get_mut(day_index)
            .ok_or(FleetError::DayOutOfRange { index: day_index, days })?;
        reading.value = value;
        self.avg = average(&self.values())?;
        Ok(&self.readings[day_index])
    }
}

fn values_of(readings: &[DailyReading]) -> Vec<f64> {
    readings.iter().map(|r| r.value).collect()
}

/// Round half away from zero to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Arithmetic mean rounded to one decimal place.
pub fn average(values: &[f64]) -> Result<f64, FleetError> {
    if values.is_empty() {
        return Err(FleetError::EmptySeries);
    }
    let total: f64 = values.iter().sum();
    Ok(round1(total / values.len() as f64))
}

/// Mean of the per-equipment averages.
pub fn fleet_average(series: &[EquipmentSeries]) -> Result<f64, FleetError> {
    let avgs: Vec<f64> = series.iter().map(EquipmentSeries::avg).collect();
    average(&avgs)
}

/// One series per profile, in declaration order. Deterministic per (month, year).
pub fn generate(month: u32, year: i32) -> Result<Vec<EquipmentSeries>, FleetError> {
    let period = Period::new(month, year)?;
    let days = period.days();

    PROFILES
        .iter()
        .enumerate()
        .map(|(position, profile)| {
            let seed = position + 1;
            let readings = (0..days)
                .map(|i| DailyReading::new(period.day_label(i), synthetic_value(profile, seed, i, days)))
                .collect();
            EquipmentSeries::new(profile, readings)
        })
        .collect()
}

fn synthetic_value(profile: &EquipmentProfile, seed: usize, day_index: usize, days: usize) -> f64 {
    let noise = ((day_index + seed + days) as f64).sin() * profile.variance;
    round1((profile.base + noise).clamp(GENERATED_FLOOR, 100.0))
}

/// Clamp an edited value into [0, 100] at one decimal. NaN becomes 0.
pub fn clamp_reading(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round1(value.clamp(0.0, 100.0))
}

/// Normalise free-text cell input: the leading number is kept and any trailing
/// text ignored ("97.5%" is 97.5). No leading number means 0. Then clamp.
pub fn normalize_input(raw: &str) -> f64 {
    clamp_reading(leading_number(raw).unwrap_or(0.0))
}

/// Longest numeric prefix after leading whitespace: optional sign, then either
/// `Infinity` or digits with an optional fraction and exponent.
fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = digits(end);
    end += int_digits;
    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// A cell edit as it arrives from a client: a number or raw typed text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellInput {
    Number(f64),
    Text(String),
}

impl CellInput {
    pub fn normalized(&self) -> f64 {
        match self {
            CellInput::Number(value) => clamp_reading(*value),
            CellInput::Text(raw) => normalize_input(raw),
        }
    }
}
