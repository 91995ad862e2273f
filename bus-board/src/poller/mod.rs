//! Per-stop polling.
//!
//! One [`StopPoller`] per tracked stop, owned by a [`StopRegistry`]
//! keyed by stop id. Each poller runs the same loop: fetch the
//! prediction document, parse it, filter and bound the arrivals, emit a
//! [`StopUpdate`], and arm a timer for the next tick. No fetch outcome
//! stops the loop; suspending cancels only the timer.

mod config;
mod poller;
mod registry;
mod update;

pub use config::StopConfig;
pub use poller::StopPoller;
pub use registry::StopRegistry;
pub use update::StopUpdate;
