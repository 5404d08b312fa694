use std::sync::Arc;

use tidewatch_core::Event;
use tidewatch_ledger::EventLog;

use crate::project::*;
use crate::types::*;

#[derive(Debug, Default)]
struct ViewCache {
    tanks: Option<Arc<[TankEntry]>>,
    injections: Option<Arc<[InjectionEntry]>>,
    alerts: Option<Arc<[Event]>>,
    recent: Option<Arc<[Event]>>,
}

/// Lazily computed views over one [`EventLog`].
///
/// Views are built on first read after a change and cached against the
/// log's revision, so repeated reads of an unchanged log return the same
/// allocation. A projector must only ever be fed the same log.
#[derive(Debug, Default)]
pub struct Projector {
    revision: Option<u64>,
    cache: ViewCache,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(&mut self, log: &EventLog) {
        if self.revision != Some(log.revision()) {
            self.cache = ViewCache::default();
            self.revision = Some(log.revision());
        }
    }

    pub fn project(&mut self, kind: ViewKind, log: &EventLog) -> View {
        match kind {
            ViewKind::Tanks => View::Tanks(self.tanks(log)),
            ViewKind::Injections => View::Injections(self.injections(log)),
            ViewKind::Alerts => View::Alerts(self.alerts(log)),
            ViewKind::Recent => View::Recent(self.recent(log)),
        }
    }

    pub fn tanks(&mut self, log: &EventLog) -> Arc<[TankEntry]> {
        self.sync(log);
        self.cache
            .tanks
            .get_or_insert_with(|| project_tanks(log).into())
            .clone()
    }

    pub fn injections(&mut self, log: &EventLog) -> Arc<[InjectionEntry]> {
        self.sync(log);
        self.cache
            .injections
            .get_or_insert_with(|| project_injections(log).into())
            .clone()
    }

    pub fn alerts(&mut self, log: &EventLog) -> Arc<[Event]> {
        self.sync(log);
        self.cache
            .alerts
            .get_or_insert_with(|| project_alerts(log).into())
            .clone()
    }

    pub fn recent(&mut self, log: &EventLog) -> Arc<[Event]> {
        self.sync(log);
        self.cache
            .recent
            .get_or_insert_with(|| project_recent(log).into())
            .clone()
    }
}
