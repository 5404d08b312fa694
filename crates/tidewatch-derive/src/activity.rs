use tidewatch_core::{Event, Observation};

use crate::types::ActivityLine;

/// Longest payload preview shown for events without a dedicated format.
pub const PREVIEW_CHARS: usize = 120;

fn or_q(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("?")
}

/// Describe an event as a line in the agent activity feed.
pub fn describe(ev: &Event) -> ActivityLine {
    let message = match ev.observation() {
        Observation::Pollution(p) => format!(
            "Detected pollution at {}",
            p.source_id.as_deref().unwrap_or("unknown source")
        ),
        Observation::TankSealed(t) => {
            format!("Sealed tank {} from {}", or_q(&t.tank_id), or_q(&t.origin))
        }
        Observation::TankDelivered(d) => format!(
            "Delivered tank {} to {}",
            or_q(&d.tank_id),
            d.to.as_deref().unwrap_or("port")
        ),
        Observation::Injection(r) => format!(
            "Injected tank {} into well {}",
            or_q(&r.tank_id),
            or_q(&r.well_id)
        ),
        Observation::Alert(a) => format!("Alert: {}", a.headline().unwrap_or("unknown")),
        Observation::Unknown { payload, .. } => payload.compact(PREVIEW_CHARS),
    };
    ActivityLine {
        agent: ev.kind.agent(),
        message,
    }
}

/// Activity lines for a slice of events, same order.
pub fn activity_lines(events: &[Event]) -> Vec<ActivityLine> {
    events.iter().map(describe).collect()
}

/// One-line payload summary for the raw event stream, independent of kind.
pub fn summarize_payload(ev: &Event) -> String {
    let p = &ev.payload;
    if let Some(tank) = p.text("tank_id") {
        if let Some(origin) = p.text("origin") {
            return format!("tank {tank} from {origin}");
        }
        if let Some(status) = p.text("status") {
            return format!("tank {tank} -> {status}");
        }
    }
    if let Some(id) = p.text("event_id") {
        return id;
    }
    p.compact(PREVIEW_CHARS)
}

/// Text for an alert chip.
pub fn alert_headline(ev: &Event) -> String {
    match ev.observation() {
        Observation::Alert(a) => a
            .headline()
            .map(str::to_string)
            .unwrap_or_else(|| ev.kind.as_str().to_string()),
        _ => ev.kind.as_str().to_string(),
    }
}
