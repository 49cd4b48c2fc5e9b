use thiserror::Error;

/// Errors that can occur when resolving a league key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeagueError {
    #[error("Unknown league: {0}")]
    Unknown(String),
}
