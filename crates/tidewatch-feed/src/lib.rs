pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod source;

pub use client::{retrieve, FeedClient, DEFAULT_LIMIT, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use config::FeedConfig;
pub use error::FeedError;
pub use monitor::{ApplyOutcome, DashboardSnapshot, Monitor, SessionToken};
pub use source::{DrainSource, HttpDrainSource};
