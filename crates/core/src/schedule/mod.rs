mod error;
mod responses;
mod time;
mod types;

pub use error::ScheduleError;
pub use responses::{TeamScheduleResponse, TeamsResponse};
pub use time::parse_event_start;
pub use types::{Competition, Competitor, EventStatus, ScheduleRecord, StatusType, TeamRef, Venue};
