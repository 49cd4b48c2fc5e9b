use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::league::League;
use crate::schedule::{ScheduleError, ScheduleRecord};

use super::IcsWriter;

/// Range of game dates, relative to today, that a feed includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub past_days: i64,
    pub future_days: i64,
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self {
            past_days: 30,
            future_days: 365,
        }
    }
}

impl FeedWindow {
    /// Returns true if `date` lies within the window around `today`, inclusive.
    ///
    /// A bound past the representable date range is treated as unbounded.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let start = Duration::try_days(self.past_days)
            .and_then(|days| today.checked_sub_signed(days))
            .unwrap_or(NaiveDate::MIN);
        let end = Duration::try_days(self.future_days)
            .and_then(|days| today.checked_add_signed(days))
            .unwrap_or(NaiveDate::MAX);
        start <= date && date <= end
    }
}

/// Why a record was left out of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    InvalidDate(ScheduleError),
    MissingTeams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    pub id: Option<String>,
    pub reason: SkipReason,
}

/// A rendered calendar plus what was left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFeed {
    pub body: String,
    pub event_count: usize,
    /// Records that could not be rendered. Out-of-window games are not listed.
    pub skipped: Vec<SkippedEvent>,
}

struct RenderedEvent<'a> {
    id: &'a str,
    start: DateTime<Utc>,
    home: &'a str,
    away: &'a str,
}

fn render_parts(record: &ScheduleRecord) -> Result<RenderedEvent<'_>, SkipReason> {
    let id = record.id.as_deref().ok_or(SkipReason::MissingId)?;
    let start = record.start_time().map_err(SkipReason::InvalidDate)?;
    let (Some(home), Some(away)) = (record.home_team(), record.away_team()) else {
        return Err(SkipReason::MissingTeams);
    };
    Ok(RenderedEvent {
        id,
        start,
        home,
        away,
    })
}

/// Renders a league's schedule as an iCalendar document.
///
/// # Arguments
///
/// * `league` - Determines `PRODID`, UIDs and the event duration.
/// * `records` - Cached schedule records, rendered in order.
/// * `window` - Games outside this window around `now` are omitted.
/// * `now` - Anchors the window.
/// * `stamp` - Written as every event's `DTSTAMP`, normally the fetch time.
pub fn build_calendar(
    league: League,
    records: &[ScheduleRecord],
    window: &FeedWindow,
    now: DateTime<Utc>,
    stamp: DateTime<Utc>,
) -> CalendarFeed {
    let today = now.date_naive();
    let mut writer = IcsWriter::new();
    let mut skipped = Vec::new();
    let mut event_count = 0;

    writer
        .begin("VCALENDAR")
        .raw("VERSION", "2.0")
        .text("PRODID", &league.prodid())
        .raw("CALSCALE", "GREGORIAN")
        .text("X-WR-CALNAME", &league.as_str().to_uppercase());

    for record in records {
        let event = match render_parts(record) {
            Ok(event) => event,
            Err(reason) => {
                skipped.push(SkippedEvent {
                    id: record.id.clone(),
                    reason,
                });
                continue;
            }
        };

        if !window.contains(event.start.date_naive(), today) {
            continue;
        }

        writer
            .begin("VEVENT")
            .text("UID", &format!("{}-{}@sports", league.as_str(), event.id))
            .timestamp("DTSTAMP", stamp)
            .timestamp("DTSTART", event.start)
            .timestamp("DTEND", event.start + league.game_length())
            .text("SUMMARY", &format!("{} @ {}", event.away, event.home));

        if let Some(venue) = record.venue() {
            writer.text("LOCATION", venue);
        }
        if let Some(status) = record.status_description() {
            writer.text("DESCRIPTION", status);
        }

        writer.end("VEVENT");
        event_count += 1;
    }

    writer.end("VCALENDAR");

    CalendarFeed {
        body: writer.finish(),
        event_count,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Competition, Competitor, EventStatus, StatusType, TeamRef, Venue};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()
    }

    fn competitor(side: &str, name: &str) -> Competitor {
        Competitor {
            home_away: Some(side.to_string()),
            team: Some(TeamRef {
                display_name: Some(name.to_string()),
            }),
        }
    }

    fn game(id: &str, date: &str) -> ScheduleRecord {
        ScheduleRecord {
            id: Some(id.to_string()),
            date: Some(date.to_string()),
            competitions: vec![Competition {
                competitors: vec![
                    competitor("home", "Buffalo Bills"),
                    competitor("away", "Kansas City Chiefs"),
                ],
                venue: Some(Venue {
                    full_name: Some("Highmark Stadium".to_string()),
                }),
            }],
            status: Some(EventStatus {
                kind: Some(StatusType {
                    description: Some("Scheduled".to_string()),
                }),
            }),
        }
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = FeedWindow::default();
        let today = now().date_naive();

        assert!(window.contains(today - Duration::days(30), today));
        assert!(window.contains(today + Duration::days(365), today));
        assert!(!window.contains(today - Duration::days(31), today));
        assert!(!window.contains(today + Duration::days(366), today));
    }

    #[test]
    fn test_window_beyond_date_range_is_unbounded() {
        let today = now().date_naive();
        let huge = FeedWindow {
            past_days: i64::MAX,
            future_days: 200_000_000,
        };

        assert!(huge.contains(NaiveDate::MIN, today));
        assert!(huge.contains(NaiveDate::MAX, today));
    }

    #[test]
    fn test_huge_window_renders_instead_of_panicking() {
        let records = vec![game("401", "2025-11-12T18:20Z")];
        let window = FeedWindow {
            past_days: 30,
            future_days: 200_000_000,
        };

        let feed = build_calendar(League::Nfl, &records, &window, now(), now());

        assert_eq!(feed.event_count, 1);
    }

    #[test]
    fn test_renders_event() {
        let records = vec![game("401", "2025-11-12T18:20Z")];
        let feed = build_calendar(League::Nfl, &records, &FeedWindow::default(), now(), now());

        assert_eq!(feed.event_count, 1);
        assert!(feed.skipped.is_empty());

        let body = &feed.body;
        assert!(body.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(body.contains("PRODID:-//Homepage Sports Calendar//NFL//EN\r\n"));
        assert!(body.contains("UID:nfl-401@sports\r\n"));
        assert!(body.contains("DTSTAMP:20251101T120000Z\r\n"));
        assert!(body.contains("DTSTART:20251112T182000Z\r\n"));
        assert!(body.contains("DTEND:20251112T212000Z\r\n"));
        assert!(body.contains("SUMMARY:Kansas City Chiefs @ Buffalo Bills\r\n"));
        assert!(body.contains("LOCATION:Highmark Stadium\r\n"));
        assert!(body.contains("DESCRIPTION:Scheduled\r\n"));
        assert!(body.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
    }

    #[test]
    fn test_nba_games_last_two_and_a_half_hours() {
        let records = vec![game("9", "2025-11-12T00:30Z")];
        let feed = build_calendar(League::Nba, &records, &FeedWindow::default(), now(), now());

        assert!(feed.body.contains("UID:nba-9@sports\r\n"));
        assert!(feed.body.contains("DTEND:20251112T030000Z\r\n"));
    }

    #[test]
    fn test_out_of_window_games_are_omitted_silently() {
        let records = vec![
            game("old", "2025-09-01T17:00Z"),
            game("far", "2027-01-01T17:00Z"),
        ];
        let feed = build_calendar(League::Nfl, &records, &FeedWindow::default(), now(), now());

        assert_eq!(feed.event_count, 0);
        assert!(feed.skipped.is_empty());
        assert!(!feed.body.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_unrenderable_records_are_reported() {
        let mut no_teams = game("2", "2025-11-12T18:20Z");
        no_teams.competitions.clear();
        let mut no_id = game("3", "2025-11-12T18:20Z");
        no_id.id = None;

        let records = vec![game("1", "someday"), no_teams, no_id];
        let feed = build_calendar(League::Nfl, &records, &FeedWindow::default(), now(), now());

        assert_eq!(feed.event_count, 0);
        assert_eq!(
            feed.skipped,
            vec![
                SkippedEvent {
                    id: Some("1".to_string()),
                    reason: SkipReason::InvalidDate(ScheduleError::InvalidDate(
                        "someday".to_string()
                    )),
                },
                SkippedEvent {
                    id: Some("2".to_string()),
                    reason: SkipReason::MissingTeams,
                },
                SkippedEvent {
                    id: None,
                    reason: SkipReason::MissingId,
                },
            ]
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let mut record = game("5", "2025-11-12T18:20Z");
        record.status = None;
        record.competitions[0].venue = None;

        let feed = build_calendar(League::Nfl, &[record], &FeedWindow::default(), now(), now());

        assert_eq!(feed.event_count, 1);
        assert!(!feed.body.contains("LOCATION:"));
        assert!(!feed.body.contains("DESCRIPTION:"));
    }

    #[test]
    fn test_text_values_are_escaped() {
        let mut record = game("6", "2025-11-12T18:20Z");
        record.competitions[0].venue = Some(Venue {
            full_name: Some("Stadium, Field; Arena".to_string()),
        });

        let feed = build_calendar(League::Nfl, &[record], &FeedWindow::default(), now(), now());

        assert!(feed.body.contains("LOCATION:Stadium\\, Field\\; Arena\r\n"));
    }

    #[test]
    fn test_empty_schedule_is_a_valid_calendar() {
        let feed = build_calendar(League::Nba, &[], &FeedWindow::default(), now(), now());

        assert_eq!(feed.event_count, 0);
        assert!(feed.body.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(feed.body.ends_with("END:VCALENDAR\r\n"));
    }
}
