mod activity;
mod project;
mod projector;
mod types;

pub use activity::{activity_lines, alert_headline, describe, summarize_payload, PREVIEW_CHARS};
pub use project::{project_alerts, project_injections, project_recent, project_tanks};
pub use projector::Projector;
pub use types::*;
