//! iCalendar feed generation from cached schedule records.

mod builder;
mod ics;

pub use builder::{build_calendar, CalendarFeed, FeedWindow, SkipReason, SkippedEvent};
pub use ics::{escape_text, format_utc, IcsWriter};
