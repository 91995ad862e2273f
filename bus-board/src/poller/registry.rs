//! The stop-poller arena and host control surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::domain::StopId;
use crate::feed::PredictionSource;

use super::config::StopConfig;
use super::poller::StopPoller;
use super::update::StopUpdate;

/// Owns one poller per tracked stop and fans their updates into a
/// single channel.
///
/// Registration is idempotent per stop id: the first registration
/// creates a poller and fetches immediately; later registrations reuse
/// the existing poller and its configuration. Pollers live until the
/// process ends; there is no teardown beyond [`suspend_all`].
///
/// The registry must be used from within a tokio runtime; pollers spawn
/// their fetch and timer tasks on it.
///
/// [`suspend_all`]: StopRegistry::suspend_all
pub struct StopRegistry<S> {
    source: Arc<S>,
    updates: UnboundedSender<StopUpdate>,
    pollers: Mutex<HashMap<StopId, Arc<StopPoller<S>>>>,
}

impl<S: PredictionSource + 'static> StopRegistry<S> {
    /// Create a registry and the channel its pollers deliver updates on.
    pub fn new(source: S) -> (Self, UnboundedReceiver<StopUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (
            Self {
                source: Arc::new(source),
                updates,
                pollers: Mutex::new(HashMap::new()),
            },
            rx,
        )
    }

    /// Track a stop, or re-announce one that is already tracked.
    ///
    /// A new stop id gets a poller that fetches immediately. For an
    /// already-tracked stop id the given configuration is ignored: the
    /// existing poller re-emits its cached events (no synchronous
    /// re-fetch) and its timer is armed if it was idle.
    pub fn register_stop(&self, config: StopConfig) {
        let stop_id = config.stop_id.clone();

        let mut pollers = self.lock();
        if let Some(existing) = pollers.get(&stop_id) {
            let existing = Arc::clone(existing);
            drop(pollers);

            info!(stop = %stop_id, "stop already tracked, serving cached events");
            existing.broadcast_last();
            existing.ensure_scheduled();
            return;
        }

        let poller = Arc::new(StopPoller::new(
            config,
            Arc::clone(&self.source),
            self.updates.clone(),
        ));
        pollers.insert(stop_id.clone(), Arc::clone(&poller));
        drop(pollers);

        info!(
            stop = %stop_id,
            interval_ms = poller.config().fetch_interval_ms,
            "tracking new stop"
        );
        poller.start_fetch();
    }

    /// Cancel every tracked poller's pending timer.
    ///
    /// In-flight requests are not cancelled; each completes, delivers
    /// its outcome and arms a fresh timer.
    pub fn suspend_all(&self) {
        let pollers = self.snapshot();
        info!(count = pollers.len(), "suspending pollers");
        for poller in pollers {
            poller.stop_fetch();
        }
    }

    /// Trigger an immediate fetch on every tracked poller.
    pub fn resume_all(&self) {
        let pollers = self.snapshot();
        info!(count = pollers.len(), "resuming pollers");
        for poller in pollers {
            poller.start_fetch();
        }
    }

    /// Number of tracked stops.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether any stops are tracked.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<StopPoller<S>>> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<StopId, Arc<StopPoller<S>>>> {
        // a poisoned lock still holds a usable map
        self.pollers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
