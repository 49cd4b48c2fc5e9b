//! Root route handler.

use sportscal_core::league::League;

/// Handler for GET /
///
/// Plain-text banner listing the available feeds.
pub async fn root() -> String {
    let feeds: Vec<String> = League::ALL.iter().map(League::feed_path).collect();
    format!(
        "Sports ICS server is running. Available feeds: {}\n",
        feeds.join(", ")
    )
}
