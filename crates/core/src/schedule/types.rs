use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_event_start, ScheduleError};

/// A single scheduled game as published by the upstream schedule API.
///
/// Every field is optional so that one malformed event never fails a whole
/// team schedule; the feed builder skips events it cannot render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// Kickoff/tip-off time as an ISO 8601 string (seconds are optional).
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// Either `"home"` or `"away"`.
    #[serde(default, rename = "homeAway")]
    pub home_away: Option<String>,
    #[serde(default)]
    pub team: Option<TeamRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatus {
    #[serde(default, rename = "type")]
    pub kind: Option<StatusType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusType {
    #[serde(default)]
    pub description: Option<String>,
}

impl ScheduleRecord {
    /// Parses the event start time into UTC.
    pub fn start_time(&self) -> Result<DateTime<Utc>, ScheduleError> {
        let raw = self.date.as_deref().ok_or(ScheduleError::MissingDate)?;
        parse_event_start(raw)
    }

    fn primary_competition(&self) -> Option<&Competition> {
        self.competitions.first()
    }

    fn team_name(&self, side: &str) -> Option<&str> {
        self.primary_competition()?
            .competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(side))?
            .team
            .as_ref()?
            .display_name
            .as_deref()
    }

    /// Display name of the home team.
    pub fn home_team(&self) -> Option<&str> {
        self.team_name("home")
    }

    /// Display name of the away team.
    pub fn away_team(&self) -> Option<&str> {
        self.team_name("away")
    }

    /// Full name of the venue, if published.
    pub fn venue(&self) -> Option<&str> {
        self.primary_competition()?
            .venue
            .as_ref()?
            .full_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Human-readable status (e.g. "Scheduled", "Final").
    pub fn status_description(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .kind
            .as_ref()?
            .description
            .as_deref()
            .filter(|desc| !desc.is_empty())
    }
}
