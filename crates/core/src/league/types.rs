use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::LeagueError;

/// A league whose schedule is published as a calendar feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nfl,
    Nba,
}

impl League {
    /// Every supported league, in feed listing order.
    pub const ALL: [League; 2] = [League::Nfl, League::Nba];

    /// Returns the lowercase key used in URLs and cache logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Nfl => "nfl",
            League::Nba => "nba",
        }
    }

    /// Returns the upstream sport path segment for this league.
    pub fn sport_path(&self) -> &'static str {
        match self {
            League::Nfl => "football",
            League::Nba => "basketball",
        }
    }

    /// Returns the approximate length of a game, used as the event duration.
    pub fn game_length(&self) -> Duration {
        match self {
            League::Nfl => Duration::hours(3),
            League::Nba => Duration::minutes(150),
        }
    }

    /// Returns the iCalendar `PRODID` for this league's feed.
    pub fn prodid(&self) -> String {
        format!(
            "-//Homepage Sports Calendar//{}//EN",
            self.as_str().to_uppercase()
        )
    }

    /// Returns the feed path served for this league (e.g. `/nfl.ics`).
    pub fn feed_path(&self) -> String {
        format!("/{}.ics", self.as_str())
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nfl" => Ok(League::Nfl),
            "nba" => Ok(League::Nba),
            _ => Err(LeagueError::Unknown(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_leagues() {
        assert_eq!("nfl".parse::<League>(), Ok(League::Nfl));
        assert_eq!("NBA".parse::<League>(), Ok(League::Nba));
        assert_eq!(" nfl ".parse::<League>(), Ok(League::Nfl));
    }

    #[test]
    fn test_parse_unknown_league() {
        assert_eq!(
            "mlb".parse::<League>(),
            Err(LeagueError::Unknown("mlb".to_string()))
        );
        assert!("".parse::<League>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for league in League::ALL {
            assert_eq!(league.to_string().parse::<League>(), Ok(league));
        }
    }

    #[test]
    fn test_sport_paths() {
        assert_eq!(League::Nfl.sport_path(), "football");
        assert_eq!(League::Nba.sport_path(), "basketball");
    }

    #[test]
    fn test_game_length() {
        assert_eq!(League::Nfl.game_length(), Duration::minutes(180));
        assert_eq!(League::Nba.game_length(), Duration::minutes(150));
    }

    #[test]
    fn test_prodid_and_feed_path() {
        assert_eq!(League::Nfl.prodid(), "-//Homepage Sports Calendar//NFL//EN");
        assert_eq!(League::Nba.feed_path(), "/nba.ics");
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&League::Nba).unwrap();
        assert_eq!(json, "\"nba\"");
    }
}
