//! Ordered event log shared between collaborating test fixtures.

use std::sync::{Arc, Mutex, MutexGuard};

/// Records labelled events in the order they happen.
///
/// Clones share the same log, so a tracker can be handed to every
/// collaborator whose relative ordering a test wants to assert.
#[derive(Debug, Clone, Default)]
pub struct SequenceTracker {
    events: Arc<Mutex<Vec<String>>>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an event and return its 1-based step number.
    pub fn record(&self, label: impl Into<String>) -> usize {
        let mut events = self.lock();
        events.push(label.into());
        events.len()
    }

    /// Number of events recorded so far.
    pub fn steps(&self) -> usize {
        self.lock().len()
    }

    pub fn events(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Step number of the first event with `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.lock()
            .iter()
            .position(|event| event == label)
            .map(|index| index + 1)
    }
}
