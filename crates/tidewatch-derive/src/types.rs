use std::sync::Arc;

use serde::Serialize;
use tidewatch_core::{Agent, Event};

/// Size of the unified recent-activity window.
pub const RECENT_WINDOW: usize = 20;

// ── View entries ──

/// One sealed tank, from a `tank_ready` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TankEntry {
    pub tank_id: Option<String>,
    pub origin: Option<String>,
    pub mass_co2_kg: Option<f64>,
    pub pressure_psi: Option<f64>,
    pub sealed: Option<bool>,
    pub timestamp: Option<String>,
}

/// One completed injection, from an `injection_report` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InjectionEntry {
    pub well_id: Option<String>,
    pub tank_id: Option<String>,
    pub status: Option<String>,
    pub mass_tonnes: Option<f64>,
    pub timestamp: Option<String>,
}

/// Human-readable line for the agent activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLine {
    pub agent: Agent,
    pub message: String,
}

// ── View selection ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Tanks,
    Injections,
    Alerts,
    Recent,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Tanks,
        ViewKind::Injections,
        ViewKind::Alerts,
        ViewKind::Recent,
    ];
}

/// A projected view. Contents are shared; callers must not expect to
/// mutate them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "entries", rename_all = "snake_case")]
pub enum View {
    Tanks(Arc<[TankEntry]>),
    Injections(Arc<[InjectionEntry]>),
    Alerts(Arc<[Event]>),
    Recent(Arc<[Event]>),
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Tanks(_) => ViewKind::Tanks,
            View::Injections(_) => ViewKind::Injections,
            View::Alerts(_) => ViewKind::Alerts,
            View::Recent(_) => ViewKind::Recent,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            View::Tanks(v) => v.len(),
            View::Injections(v) => v.len(),
            View::Alerts(v) => v.len(),
            View::Recent(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when both views share the same allocation.
    pub fn same_as(&self, other: &View) -> bool {
        match (self, other) {
            (View::Tanks(a), View::Tanks(b)) => Arc::ptr_eq(a, b),
            (View::Injections(a), View::Injections(b)) => Arc::ptr_eq(a, b),
            (View::Alerts(a), View::Alerts(b)) => Arc::ptr_eq(a, b),
            (View::Recent(a), View::Recent(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
