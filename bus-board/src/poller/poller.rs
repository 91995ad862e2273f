//! The per-stop fetch/schedule loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::Arrival;
use crate::feed::{ParsedPrediction, PredictionSource, parse_predictions};
use crate::filter;

use super::config::StopConfig;
use super::update::StopUpdate;

/// Mutable per-stop state. Critical sections are brief and never await.
struct PollerState {
    /// Handle of the armed timer task, if any.
    timer: Option<JoinHandle<()>>,
    /// Whether a fetch task is currently running for this stop.
    fetch_in_flight: bool,
    /// The most recently delivered arrival list.
    last_events: Vec<Arrival>,
    /// When `last_events` was fetched.
    last_fetched_at: Option<DateTime<Utc>>,
}

/// Polls a single stop on a fixed interval.
///
/// The poller owns its timer handle and its last-events cache
/// exclusively. At most one fetch is in flight at a time, and a new
/// timer is armed only after the previous fetch has fully completed, so
/// a slow feed never stacks up concurrent requests for the same stop.
///
/// Every fetch outcome re-arms the timer, failures included, so a
/// poller recovers from upstream trouble on its own at the next tick.
pub struct StopPoller<S> {
    config: StopConfig,
    source: Arc<S>,
    updates: UnboundedSender<StopUpdate>,
    state: Mutex<PollerState>,
}

impl<S: PredictionSource + 'static> StopPoller<S> {
    /// Create a poller in the idle state: no timer armed, empty cache.
    pub(crate) fn new(
        config: StopConfig,
        source: Arc<S>,
        updates: UnboundedSender<StopUpdate>,
    ) -> Self {
        Self {
            config,
            source,
            updates,
            state: Mutex::new(PollerState {
                timer: None,
                fetch_in_flight: false,
                last_events: Vec::new(),
                last_fetched_at: None,
            }),
        }
    }

    /// The configuration this poller was created with.
    pub fn config(&self) -> &StopConfig {
        &self.config
    }

    /// Trigger a fetch now.
    ///
    /// No-op while a fetch is already in flight. Otherwise cancels any
    /// pending timer and spawns the fetch immediately.
    pub fn start_fetch(self: Arc<Self>) {
        {
            let mut state = self.state();
            if state.fetch_in_flight {
                debug!(stop = %self.config.stop_id, "fetch already in flight");
                return;
            }
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.fetch_in_flight = true;
        }
        tokio::spawn(self.fetch_stop());
    }

    /// Cancel the pending timer.
    ///
    /// An in-flight fetch is not cancelled; it completes, delivers its
    /// outcome, and arms a fresh timer. Stopping and immediately
    /// resuming can therefore still process one stale response.
    pub fn stop_fetch(&self) {
        let mut state = self.state();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Arm the timer if the poller is idle.
    ///
    /// Does nothing while a timer is already pending or a fetch is in
    /// flight (its completion arms one).
    pub fn ensure_scheduled(self: Arc<Self>) {
        let mut state = self.state();
        if state.fetch_in_flight || state.timer.is_some() {
            return;
        }
        state.timer = Some(Self::arm_timer(&self));
    }

    /// Re-emit the cached events, e.g. when a stop is re-registered.
    pub fn broadcast_last(&self) {
        let (events, fetched_at) = {
            let state = self.state();
            (state.last_events.clone(), state.last_fetched_at)
        };
        self.send(StopUpdate::Events {
            stop_id: self.config.stop_id.clone(),
            events,
            fetched_at,
        });
    }

    /// A snapshot of the most recently delivered events.
    pub fn last_events(&self) -> Vec<Arrival> {
        self.state().last_events.clone()
    }

    /// One full fetch cycle: request, process, re-arm.
    async fn fetch_stop(self: Arc<Self>) {
        debug!(stop = %self.config.stop_id, "fetching predictions");

        match self.source.fetch_predictions(&self.config.stop_id).await {
            Ok(body) => self.process_body(&body),
            Err(e) => {
                warn!(stop = %self.config.stop_id, error = %e, "fetch failed");
                self.send(StopUpdate::FetchFailed {
                    stop_id: self.config.stop_id.clone(),
                    error: e.to_string(),
                });
            }
        }

        // The completing fetch owns the schedule: drop any timer armed
        // while the request was in flight, then arm the next tick.
        let mut state = self.state();
        state.fetch_in_flight = false;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.timer = Some(Self::arm_timer(&self));
    }

    /// Parse, filter and deliver a fetched document.
    ///
    /// A batch containing any malformed record is reported as a failed
    /// fetch and the cache is left untouched; good sibling entries are
    /// not delivered alongside the error.
    fn process_body(&self, body: &str) {
        let mut arrivals = Vec::new();
        for record in parse_predictions(body) {
            match record {
                ParsedPrediction::Arrival(arrival) => arrivals.push(arrival),
                ParsedPrediction::Error(e) => {
                    warn!(stop = %self.config.stop_id, error = %e, "unusable prediction document");
                    self.send(StopUpdate::FetchFailed {
                        stop_id: self.config.stop_id.clone(),
                        error: e.to_string(),
                    });
                    return;
                }
            }
        }

        let events = filter::apply(arrivals, &self.config);
        let fetched_at = Utc::now();
        {
            let mut state = self.state();
            state.last_events = events.clone();
            state.last_fetched_at = Some(fetched_at);
        }

        debug!(stop = %self.config.stop_id, events = events.len(), "delivering arrivals");
        self.send(StopUpdate::Events {
            stop_id: self.config.stop_id.clone(),
            events,
            fetched_at: Some(fetched_at),
        });
    }

    /// Spawn a task that waits one interval and then triggers a fetch.
    fn arm_timer(poller: &Arc<Self>) -> JoinHandle<()> {
        let poller = Arc::clone(poller);
        tokio::spawn(async move {
            tokio::time::sleep(poller.config.fetch_interval()).await;
            poller.start_fetch();
        })
    }

    fn send(&self, update: StopUpdate) {
        // The receiver dropping means the host has gone away; there is
        // nowhere left to deliver to.
        if self.updates.send(update).is_err() {
            debug!(stop = %self.config.stop_id, "update channel closed");
        }
    }

    fn state(&self) -> MutexGuard<'_, PollerState> {
        // a poisoned lock still holds usable state
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
