mod error;
mod types;

pub use error::LeagueError;
pub use types::League;
