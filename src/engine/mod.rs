pub mod letter_stats;
pub mod matcher;
pub mod stats;
