//! Wire shapes of the upstream schedule API.

use serde::{Deserialize, Serialize};

use super::ScheduleRecord;

/// Response of `GET {sport}/{league}/teams`.
///
/// The `sports`, `leagues` and `teams` arrays are required: a response
/// without them is a contract break, not an empty league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub sports: Vec<SportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportEntry {
    pub leagues: Vec<LeagueTeams>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTeams {
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    #[serde(default)]
    pub team: Option<TeamInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

impl TeamsResponse {
    /// Returns the teams of the first league of the first sport.
    ///
    /// `None` means the response did not have the expected nesting.
    pub fn teams(&self) -> Option<&[TeamEntry]> {
        self.sports
            .first()?
            .leagues
            .first()
            .map(|league| league.teams.as_slice())
    }

    /// Returns the teams that carry an id, as `(id, display name)` pairs.
    pub fn team_ids(&self) -> Option<Vec<(String, String)>> {
        let teams = self.teams()?;
        Some(
            teams
                .iter()
                .filter_map(|entry| entry.team.as_ref())
                .filter_map(|team| {
                    let id = team.id.clone().filter(|id| !id.is_empty())?;
                    let name = team.display_name.clone().unwrap_or_else(|| id.clone());
                    Some((id, name))
                })
                .collect(),
        )
    }
}

/// Response of `GET {sport}/{league}/teams/{id}/schedule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScheduleResponse {
    #[serde(default)]
    pub events: Vec<ScheduleRecord>,
}
