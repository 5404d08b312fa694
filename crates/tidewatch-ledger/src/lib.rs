pub mod log;

pub use log::{merge_newest_first, EventLog, MergeStats, MAX_EVENTS};
