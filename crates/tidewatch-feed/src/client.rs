use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::monitor::{ApplyOutcome, Monitor, SessionToken};
use crate::source::DrainSource;

/// Default delay between retrievals.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Default number of events requested per retrieval.
pub const DEFAULT_LIMIT: usize = 50;

/// Shortest accepted delay between retrievals; shorter intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Repeating retrieval loop against one [`DrainSource`].
///
/// Every tick spawns an independent retrieval; a slow one does not hold
/// back the next. Results are applied in completion order. After
/// [`FeedClient::stop`] the timer is gone and results still in flight are
/// discarded by the monitor's session check.
pub struct FeedClient<S: DrainSource + 'static> {
    source: Arc<S>,
    monitor: Arc<Monitor>,
    limit: usize,
    running: Option<Running>,
}

impl<S: DrainSource + 'static> FeedClient<S> {
    pub fn new(source: S, monitor: Arc<Monitor>) -> Self {
        Self {
            source: Arc::new(source),
            monitor,
            limit: DEFAULT_LIMIT,
            running: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn monitor(&self) -> &Arc<Monitor> {
        &self.monitor
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Retrieve immediately, then once per `interval`, until stopped.
    /// Restarts the loop if it is already running. Must be called from
    /// within a tokio runtime. An interval below [`MIN_POLL_INTERVAL`] is
    /// raised to it.
    pub fn start(&mut self, interval: Duration) {
        self.stop();
        let interval = if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                "poll interval too short, using minimum"
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };
        let token = self.monitor.begin_session();
        let cancel = CancellationToken::new();
        tracing::info!(?token, interval_ms = interval.as_millis() as u64, "feed started");
        let handle = tokio::spawn(run_loop(
            self.source.clone(),
            self.monitor.clone(),
            token,
            self.limit,
            interval,
            cancel.clone(),
        ));
        self.running = Some(Running { cancel, handle });
    }

    /// Cancel the timer and end the session. Idempotent.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            running.handle.abort();
            self.monitor.end_session();
            tracing::info!("feed stopped");
        }
    }

    /// One retrieval outside the timer. Opens a session if none is active.
    pub async fn poll_once(&self) -> ApplyOutcome {
        let token = match self.monitor.active_session() {
            Some(token) => token,
            None => self.monitor.begin_session(),
        };
        retrieve(self.source.as_ref(), &self.monitor, token, self.limit).await
    }
}

impl<S: DrainSource + 'static> Drop for FeedClient<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drain one batch and hand the result to the monitor.
pub async fn retrieve<S: DrainSource + ?Sized>(
    source: &S,
    monitor: &Monitor,
    token: SessionToken,
    limit: usize,
) -> ApplyOutcome {
    let result = source.drain(limit).await;
    let outcome = monitor.apply(token, result);
    if let ApplyOutcome::Merged(stats) = outcome {
        tracing::debug!(
            inserted = stats.inserted,
            evicted = stats.evicted,
            "retrieval merged"
        );
    }
    outcome
}

async fn run_loop<S: DrainSource + 'static>(
    source: Arc<S>,
    monitor: Arc<Monitor>,
    token: SessionToken,
    limit: usize,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let source = source.clone();
                let monitor = monitor.clone();
                tokio::spawn(async move {
                    retrieve(source.as_ref(), &monitor, token, limit).await;
                });
            }
        }
    }
}
