use thiserror::Error;

/// Errors that can occur when reading fields out of a schedule record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Event has no date")]
    MissingDate,
    #[error("Invalid event date: {0}")]
    InvalidDate(String),
}
