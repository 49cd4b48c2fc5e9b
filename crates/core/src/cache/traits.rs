use async_trait::async_trait;

use crate::league::League;
use crate::schedule::ScheduleRecord;

use super::FetchError;

/// Source of schedule records for the cache to refresh from.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetches the complete current schedule for a league.
    async fn fetch(&self, league: League) -> Result<Vec<ScheduleRecord>, FetchError>;
}
