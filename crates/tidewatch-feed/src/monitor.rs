use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tidewatch_core::{Connectivity, DrainResponse, Event};
use tidewatch_derive::{InjectionEntry, Projector, TankEntry, View, ViewKind};
use tidewatch_ledger::{EventLog, MergeStats};

use crate::error::FeedError;

/// Identifies one start/stop cycle of the feed client. Results carrying a
/// token other than the active one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

/// What [`Monitor::apply`] did with a retrieval result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Merged(MergeStats),
    /// Successful retrieval with no events.
    Empty,
    /// Retrieval failed; connectivity is now offline.
    Failed,
    /// The session ended before the result arrived; nothing changed.
    Stale,
}

/// All views plus connectivity, taken under a single lock.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub connectivity: Connectivity,
    pub tanks: Arc<[TankEntry]>,
    pub injections: Arc<[InjectionEntry]>,
    pub alerts: Arc<[Event]>,
    pub recent: Arc<[Event]>,
    pub retained: usize,
    pub merged_total: u64,
    /// Log revision the views were projected from.
    pub revision: u64,
}

struct MonitorState {
    log: EventLog,
    projector: Projector,
    connectivity: Connectivity,
    active: Option<SessionToken>,
    issued: u64,
}

/// Sole owner of the event log and connectivity flag.
///
/// Every mutation and every read goes through one mutex, so merges and
/// projections are serialized no matter how many retrievals are in flight.
pub struct Monitor {
    state: Mutex<MonitorState>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    pub fn new() -> Self {
        Self::with_log(EventLog::new())
    }

    pub fn with_log(log: EventLog) -> Self {
        Self {
            state: Mutex::new(MonitorState {
                log,
                projector: Projector::new(),
                connectivity: Connectivity::Offline,
                active: None,
                issued: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        // A panic while holding the lock cannot leave the log half-merged
        // (merge swaps in a fully built Vec), so poisoning is ignored.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── Sessions ──

    /// Start a new session, invalidating any earlier token.
    pub fn begin_session(&self) -> SessionToken {
        let mut st = self.lock();
        st.issued += 1;
        let token = SessionToken(st.issued);
        st.active = Some(token);
        token
    }

    /// End the active session. Results still in flight become stale.
    pub fn end_session(&self) {
        self.lock().active = None;
    }

    pub fn active_session(&self) -> Option<SessionToken> {
        self.lock().active
    }

    // ── Mutation ──

    /// Apply one retrieval result. The only path that mutates the log.
    pub fn apply(
        &self,
        token: SessionToken,
        result: Result<DrainResponse, FeedError>,
    ) -> ApplyOutcome {
        let mut st = self.lock();
        if st.active != Some(token) {
            tracing::debug!(?token, "discarding result from ended session");
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(resp) => {
                st.connectivity = Connectivity::Online;
                if resp.events.is_empty() {
                    return ApplyOutcome::Empty;
                }
                let stats = st.log.merge(resp.events);
                ApplyOutcome::Merged(stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "event retrieval failed");
                st.connectivity = Connectivity::Offline;
                ApplyOutcome::Failed
            }
        }
    }

    // ── Reads ──

    pub fn connectivity(&self) -> Connectivity {
        self.lock().connectivity
    }

    pub fn project(&self, kind: ViewKind) -> View {
        let mut st = self.lock();
        let MonitorState { log, projector, .. } = &mut *st;
        projector.project(kind, log)
    }

    pub fn tanks(&self) -> Arc<[TankEntry]> {
        let mut st = self.lock();
        let MonitorState { log, projector, .. } = &mut *st;
        projector.tanks(log)
    }

    pub fn injections(&self) -> Arc<[InjectionEntry]> {
        let mut st = self.lock();
        let MonitorState { log, projector, .. } = &mut *st;
        projector.injections(log)
    }

    pub fn alerts(&self) -> Arc<[Event]> {
        let mut st = self.lock();
        let MonitorState { log, projector, .. } = &mut *st;
        projector.alerts(log)
    }

    pub fn recent(&self) -> Arc<[Event]> {
        let mut st = self.lock();
        let MonitorState { log, projector, .. } = &mut *st;
        projector.recent(log)
    }

    /// Copy of the full retained log, newest first.
    pub fn events(&self) -> Vec<Event> {
        self.lock().log.entries().to_vec()
    }

    /// Events merged after the lifetime count `since`, oldest first, with
    /// the current count to pass next time. Evicted events are skipped.
    pub fn events_since(&self, since: u64) -> (Vec<Event>, u64) {
        let st = self.lock();
        let total = st.log.merged_total();
        let fresh = (total.saturating_sub(since) as usize).min(st.log.len());
        let events = st.log.newest(fresh).iter().rev().cloned().collect();
        (events, total)
    }

    /// Bumped by every non-empty merge.
    pub fn revision(&self) -> u64 {
        self.lock().log.revision()
    }

    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let mut st = self.lock();
        let MonitorState {
            log,
            projector,
            connectivity,
            ..
        } = &mut *st;
        DashboardSnapshot {
            connectivity: *connectivity,
            tanks: projector.tanks(log),
            injections: projector.injections(log),
            alerts: projector.alerts(log),
            recent: projector.recent(log),
            retained: log.len(),
            merged_total: log.merged_total(),
            revision: log.revision(),
        }
    }
}
