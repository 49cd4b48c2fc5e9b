//! Schedule cache implementation.
//!
//! The staleness policy and error taxonomy live in `sportscal_core::cache`;
//! this module adds the in-process storage and the per-league single-flight
//! refresh built on tokio primitives.

mod schedule;

pub use schedule::ScheduleCache;
