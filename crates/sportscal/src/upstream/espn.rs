//! ESPN site API client.
//!
//! A league's schedule is assembled from per-team schedules: the team list is
//! fetched first, then each team's schedule, and games are merged by event id
//! since every game appears in both teams' schedules.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::de::DeserializeOwned;

use sportscal_core::cache::{FetchError, ScheduleSource};
use sportscal_core::league::League;
use sportscal_core::schedule::{ScheduleRecord, TeamScheduleResponse, TeamsResponse};

use super::error::{Result, UpstreamError};

/// Root of the public ESPN site API.
pub const DEFAULT_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// Team schedules requested at once.
const TEAM_CONCURRENCY: usize = 4;

/// Characters of an upstream error body kept in the error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP client for the ESPN site API.
#[derive(Debug, Clone)]
pub struct EspnClient {
    client: reqwest::Client,
    base_url: String,
}

impl EspnClient {
    /// Create a client whose every request is bounded by `request_timeout`.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("sportscal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, league: League, path: &str) -> String {
        format!(
            "{}/{}/{}{}",
            self.base_url,
            league.sport_path(),
            league.as_str(),
            path
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .map(|body| body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect())
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the league's team list.
    pub async fn fetch_teams(&self, league: League) -> Result<TeamsResponse> {
        let url = self.url(league, "/teams");
        tracing::debug!(league = %league, url = %url, "Fetching team list");
        self.get_json(&url).await
    }

    /// Fetch one team's schedule.
    pub async fn fetch_team_schedule(
        &self,
        league: League,
        team_id: &str,
    ) -> Result<TeamScheduleResponse> {
        let url = self.url(league, &format!("/teams/{team_id}/schedule"));
        tracing::trace!(league = %league, team_id, "Fetching team schedule");
        self.get_json(&url).await
    }

    /// Fetch and merge every team's schedule for `league`.
    ///
    /// Teams whose schedule cannot be fetched are skipped. The fetch only
    /// fails outright when the team list is unusable or every team failed.
    pub async fn fetch_league(&self, league: League) -> Result<Vec<ScheduleRecord>> {
        let teams = self.fetch_teams(league).await?;
        let team_ids = teams.team_ids().ok_or_else(|| {
            UpstreamError::Shape("missing sports[0].leagues[0].teams".to_string())
        })?;

        tracing::info!(league = %league, teams = team_ids.len(), "Fetched team list");

        let schedules: Vec<_> = stream::iter(team_ids.iter().cloned())
            .map(|(id, name)| async move {
                let result = self.fetch_team_schedule(league, &id).await;
                (id, name, result)
            })
            .buffered(TEAM_CONCURRENCY)
            .collect()
            .await;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut succeeded = 0;
        let mut last_error = None;

        for (id, name, result) in schedules {
            match result {
                Ok(schedule) => {
                    succeeded += 1;
                    for event in schedule.events {
                        let Some(event_id) = event.id.as_deref().filter(|id| !id.is_empty())
                        else {
                            continue;
                        };
                        if seen.insert(event_id.to_string()) {
                            records.push(event);
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        league = %league,
                        team_id = %id,
                        team = %name,
                        error = %err,
                        "Skipping team schedule"
                    );
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if succeeded == 0 => Err(err),
            _ => {
                tracing::info!(
                    league = %league,
                    events = records.len(),
                    teams_ok = succeeded,
                    teams_failed = team_ids.len() - succeeded,
                    "Merged league schedule"
                );
                Ok(records)
            }
        }
    }
}

#[async_trait]
impl ScheduleSource for EspnClient {
    async fn fetch(&self, league: League) -> std::result::Result<Vec<ScheduleRecord>, FetchError> {
        self.fetch_league(league).await.map_err(FetchError::from)
    }
}
