mod error;
mod http_mapping;
mod policy;
mod traits;
mod types;

pub use error::{CacheError, FailureKind, FetchError, Result};
pub use http_mapping::cache_error_to_status_code;
pub use policy::{classify, is_expired, EntryState};
pub use traits::ScheduleSource;
pub use types::{CacheLookup, LeagueStatus};
