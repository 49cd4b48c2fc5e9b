pub mod error;
pub mod feeds;
pub mod health;
pub mod refresh;
pub mod root;
