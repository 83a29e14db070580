// Domain errors
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// Averaging an empty sequence. Every month has at least one day, so the
    /// generator never produces this.
    #[error("cannot average an empty series (division by zero)")]
    EmptySeries,

    #[error("month index {0} is outside 0..=11")]
    InvalidMonth(u32),

    #[error("year {0} is outside 1..=9999")]
    InvalidYear(i32),

    #[error("unknown equipment '{0}'")]
    UnknownEquipment(String),

    #[error("day index {index} is out of range for a {days}-day series")]
    DayOutOfRange { index: usize, days: usize },

    #[error("no editing session is open")]
    NoEditSession,
}
