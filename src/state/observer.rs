//! Synchronous snapshot observers

use tracing::debug;

use super::TimerSnapshot;

/// Receives every published snapshot, in mutation order.
///
/// Called while the session lock is held: implementations must return
/// quickly and must not call back into the session.
pub trait TimerObserver: Send + Sync {
    fn on_update(&self, snapshot: &TimerSnapshot);
}

impl<F> TimerObserver for F
where
    F: Fn(&TimerSnapshot) + Send + Sync,
{
    fn on_update(&self, snapshot: &TimerSnapshot) {
        self(snapshot)
    }
}

/// Logs each snapshot at debug level
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TimerObserver for TracingObserver {
    fn on_update(&self, snapshot: &TimerSnapshot) {
        debug!(
            "Timer update: state={:?}, display={}, input={:?}",
            snapshot.state, snapshot.display, snapshot.input
        );
    }
}
