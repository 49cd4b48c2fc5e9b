//! Client for the upstream schedule API.

mod error;
mod espn;

pub use espn::{EspnClient, DEFAULT_BASE_URL};
