use tidewatch_core::{Event, EventKind, Observation};
use tidewatch_ledger::EventLog;

use crate::types::*;

// ── Pure projections ──
//
// Each function depends only on the log content and keeps the log's
// newest-first order.

pub fn project_tanks(log: &EventLog) -> Vec<TankEntry> {
    log.iter()
        .filter_map(|ev| match ev.observation() {
            Observation::TankSealed(t) => Some(TankEntry {
                tank_id: t.tank_id,
                origin: t.origin,
                mass_co2_kg: t.mass_co2_kg,
                pressure_psi: t.pressure_psi,
                sealed: t.sealed,
                timestamp: ev.resolved_timestamp(),
            }),
            _ => None,
        })
        .collect()
}

pub fn project_injections(log: &EventLog) -> Vec<InjectionEntry> {
    log.iter()
        .filter_map(|ev| match ev.observation() {
            Observation::Injection(r) => Some(InjectionEntry {
                well_id: r.well_id,
                tank_id: r.tank_id,
                status: r.status,
                mass_tonnes: r.mass_tonnes,
                timestamp: ev.resolved_timestamp(),
            }),
            _ => None,
        })
        .collect()
}

pub fn project_alerts(log: &EventLog) -> Vec<Event> {
    log.iter()
        .filter(|ev| ev.kind == EventKind::GuardianAlert)
        .cloned()
        .collect()
}

pub fn project_recent(log: &EventLog) -> Vec<Event> {
    log.newest(RECENT_WINDOW).to_vec()
}
