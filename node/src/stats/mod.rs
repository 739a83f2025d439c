mod stats;
mod stats_enums;

pub use stats::Stats;
pub use stats_enums::{DetailType, Direction, StatType};
