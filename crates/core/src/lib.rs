//! Functional core for sportscal.
//!
//! Pure types and functions: league keys, schedule records, the cache
//! staleness policy and error taxonomy, and the iCalendar feed builder.
//! Everything that performs I/O lives in the `sportscal` crate.

pub mod cache;
pub mod feed;
pub mod league;
pub mod schedule;
