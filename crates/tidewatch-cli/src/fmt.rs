use tidewatch_core::timestamp::display_clock;
use tidewatch_core::Event;
use tidewatch_derive::{InjectionEntry, TankEntry};

/// Placeholder for a field the agent did not report.
pub const UNKNOWN: &str = "-";

pub fn opt_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn opt_num(v: Option<f64>) -> String {
    v.map(|n| n.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Missing `sealed` reads as open, matching how operators read the board.
pub fn sealed_label(sealed: Option<bool>) -> &'static str {
    if sealed == Some(true) {
        "Sealed"
    } else {
        "Open"
    }
}

pub fn event_clock(ev: &Event) -> String {
    ev.resolved_timestamp()
        .map(|ts| display_clock(&ts))
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Tank table cells: id, origin, mass (kg), pressure (psi), sealed.
pub fn tank_cells(t: &TankEntry) -> [String; 5] {
    [
        opt_text(&t.tank_id),
        opt_text(&t.origin),
        opt_num(t.mass_co2_kg),
        opt_num(t.pressure_psi),
        sealed_label(t.sealed).to_string(),
    ]
}

/// Injection table cells: well, tank, status, mass (t).
pub fn injection_cells(r: &InjectionEntry) -> [String; 4] {
    [
        opt_text(&r.well_id),
        opt_text(&r.tank_id),
        r.status.clone().unwrap_or_else(|| "unknown".to_string()),
        opt_num(r.mass_tonnes),
    ]
}

pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
