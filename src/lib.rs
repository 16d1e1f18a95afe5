pub mod config;
pub mod day;
pub mod error;
pub mod export;
mod fields;
pub mod fixtures;
pub mod grouping;
pub mod payload;
pub mod player_stats;
pub mod results;
pub mod roster;
pub mod round_two;
pub mod standings;

pub use config::SlottingConfig;
pub use day::SlottingDay;
pub use error::SlottingError;
pub use fixtures::{MatchFixture, Round, ScoreReport};
pub use grouping::{Group, Partition, PartitionLayout};
pub use roster::Player;
pub use standings::StandingEntry;
