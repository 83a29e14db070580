// Reporting period domain model
use super::error::FleetError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, FleetError> {
        if month > 11 {
            return Err(FleetError::InvalidMonth(month));
        }
        if !(1..=9999).contains(&year) {
            return Err(FleetError::InvalidYear(year));
        }
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[self.month as usize]
    }

    pub fn month_abbrev(&self) -> &'static str {
        &self.month_name()[..3]
    }

    /// Number of days in the month, Gregorian leap rules included.
    pub fn days(&self) -> usize {
        let (next_year, next_month) = if self.month == 11 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 2)
        };

        // `new` limits years to 1..=9999, so both dates exist (chrono accepts 10000).
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .expect("month end is a valid date for years 1..=9999");
        last.day() as usize
    }

    /// Day label such as "1 Jan". `day_index` is zero-based.
    pub fn day_label(&self, day_index: usize) -> String {
        format!("{} {}", day_index + 1, self.month_abbrev())
    }

    /// Human label such as "January 2025".
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}
