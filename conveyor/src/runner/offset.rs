use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default)]
struct OffsetState {
    current: Option<String>,
    committed: Option<String>,
}

/// Tracks the source offset of a running pipeline.
///
/// The runtime sets the current offset as batches complete and commits it
/// once the batch is fully processed; an operator may override the offset
/// between runs to reposition the source.
#[derive(Debug, Default)]
pub struct SourceOffsetTracker {
    state: Mutex<OffsetState>,
    last_batch_time_ms: AtomicU64,
}

impl SourceOffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offset(&self, offset: Option<String>) {
        self.state.lock().current = offset;
    }

    /// Promote the current offset to committed and stamp the batch time.
    pub fn commit_offset(&self) {
        let mut state = self.state.lock();
        state.committed = state.current.clone();
        self.last_batch_time_ms
            .store(now_millis(), Ordering::Relaxed);
    }

    pub fn current_offset(&self) -> Option<String> {
        self.state.lock().current.clone()
    }

    pub fn committed_offset(&self) -> Option<String> {
        self.state.lock().committed.clone()
    }

    /// Milliseconds since the epoch of the last committed batch; 0 when no
    /// batch has committed yet.
    pub fn last_batch_time(&self) -> u64 {
        self.last_batch_time_ms.load(Ordering::Relaxed)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_promotes_current_offset() {
        let tracker = SourceOffsetTracker::new();
        assert_eq!(tracker.committed_offset(), None);

        tracker.set_offset(Some("offset-10".to_string()));
        assert_eq!(tracker.committed_offset(), None);

        tracker.commit_offset();
        assert_eq!(tracker.committed_offset(), Some("offset-10".to_string()));
        assert!(tracker.last_batch_time() > 0);
    }

    #[test]
    fn test_uncommitted_override_is_invisible() {
        let tracker = SourceOffsetTracker::new();
        tracker.set_offset(Some("a".to_string()));
        tracker.commit_offset();
        tracker.set_offset(Some("b".to_string()));
        assert_eq!(tracker.current_offset(), Some("b".to_string()));
        assert_eq!(tracker.committed_offset(), Some("a".to_string()));
    }
}
