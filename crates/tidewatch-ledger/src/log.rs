use tidewatch_core::Event;

/// Maximum number of events retained by the dashboard log.
pub const MAX_EVENTS: usize = 200;

/// Counts from a single merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub evicted: usize,
}

/// Bounded, newest-first event log.
///
/// The only mutation is [`EventLog::merge`]; eviction from the tail is the
/// only removal. `revision` moves exactly when the content changes, so
/// derived views can be cached against it.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: Vec<Event>,
    capacity: usize,
    revision: u64,
    merged_total: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    /// A log holding at most `capacity` events (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            revision: 0,
            merged_total: 0,
        }
    }

    /// Merge a batch delivered oldest-first. The batch is reversed and
    /// placed ahead of the existing entries, then the tail is cut to
    /// capacity. An empty batch is a no-op and leaves `revision` alone.
    pub fn merge(&mut self, batch: Vec<Event>) -> MergeStats {
        if batch.is_empty() {
            return MergeStats::default();
        }
        let inserted = batch.len();
        let before = self.entries.len();
        self.entries = merge_newest_first(&self.entries, batch, self.capacity);
        let evicted = before + inserted - self.entries.len();
        self.revision += 1;
        self.merged_total += inserted as u64;
        tracing::debug!(
            inserted,
            evicted,
            len = self.entries.len(),
            revision = self.revision,
            "merged batch"
        );
        MergeStats { inserted, evicted }
    }

    /// All retained events, newest first.
    pub fn entries(&self) -> &[Event] {
        &self.entries
    }

    /// The newest `n` events (fewer if the log is shorter).
    pub fn newest(&self, n: usize) -> &[Event] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Events ever merged, including those since evicted.
    pub fn merged_total(&self) -> u64 {
        self.merged_total
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Pure merge: `batch` (oldest-first) reversed, followed by `current`
/// (newest-first), truncated to `capacity`.
pub fn merge_newest_first(current: &[Event], batch: Vec<Event>, capacity: usize) -> Vec<Event> {
    let mut merged = Vec::with_capacity((batch.len() + current.len()).min(capacity));
    merged.extend(batch.into_iter().rev().take(capacity));
    let room = capacity - merged.len();
    merged.extend(current.iter().take(room).cloned());
    merged
}
