//! Per-stop polling configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::StopId;

/// Default fetch interval in milliseconds (one minute).
const DEFAULT_FETCH_INTERVAL_MS: u64 = 60_000;

/// Default maximum number of arrivals delivered per update.
const DEFAULT_MAX_ENTRIES: usize = 10;

/// Configuration for polling a single stop.
///
/// Fixed once a poller exists for the stop id: registering the same
/// stop again with different values reuses the existing poller and
/// ignores the new configuration.
///
/// All fields but the stop id have defaults, so a host configuration
/// file can be as short as `{"stopId": "26229"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopConfig {
    /// The stop to poll.
    pub stop_id: StopId,

    /// Milliseconds between fetches. Must be positive.
    #[serde(default = "default_fetch_interval_ms")]
    pub fetch_interval_ms: u64,

    /// Route allowlist. A non-empty list keeps only arrivals whose
    /// route id equals an entry exactly (case-insensitively); an empty
    /// list keeps every route.
    #[serde(default)]
    pub routes: Vec<String>,

    /// Destination filters, matched as case-insensitive substrings of
    /// the arrival's destination.
    #[serde(default)]
    pub destinations: Vec<String>,

    /// Direction filters, matched as case-insensitive substrings
    /// against arrivals that carry a direction.
    #[serde(default)]
    pub directions: Vec<String>,

    /// Maximum number of arrivals delivered per update. Must be positive.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Drop arrivals due in more than this many minutes. `None` keeps
    /// arrivals regardless of wait. Approaching vehicles are always kept.
    #[serde(default)]
    pub max_wait_mins: Option<u32>,
}

fn default_fetch_interval_ms() -> u64 {
    DEFAULT_FETCH_INTERVAL_MS
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl StopConfig {
    /// Create a configuration with defaults: a one-minute interval, ten
    /// entries, and no filters.
    pub fn new(stop_id: StopId) -> Self {
        Self {
            stop_id,
            fetch_interval_ms: DEFAULT_FETCH_INTERVAL_MS,
            routes: Vec::new(),
            destinations: Vec::new(),
            directions: Vec::new(),
            max_entries: DEFAULT_MAX_ENTRIES,
            max_wait_mins: None,
        }
    }

    /// Set the fetch interval in milliseconds.
    pub fn with_fetch_interval_ms(mut self, ms: u64) -> Self {
        self.fetch_interval_ms = ms;
        self
    }

    /// Set the route allowlist.
    pub fn with_routes(mut self, routes: Vec<String>) -> Self {
        self.routes = routes;
        self
    }

    /// Set the destination filters.
    pub fn with_destinations(mut self, destinations: Vec<String>) -> Self {
        self.destinations = destinations;
        self
    }

    /// Set the direction filters.
    pub fn with_directions(mut self, directions: Vec<String>) -> Self {
        self.directions = directions;
        self
    }

    /// Set the maximum number of delivered arrivals.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the maximum wait in minutes.
    pub fn with_max_wait_mins(mut self, mins: u32) -> Self {
        self.max_wait_mins = Some(mins);
        self
    }

    /// Returns the fetch interval as a Duration.
    ///
    /// A zero interval would make the poller spin, so it is clamped to
    /// one millisecond.
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> StopId {
        StopId::parse("26229").unwrap()
    }

    #[test]
    fn default_config() {
        let config = StopConfig::new(stop());

        assert_eq!(config.fetch_interval_ms, 60_000);
        assert_eq!(config.max_entries, 10);
        assert!(config.routes.is_empty());
        assert!(config.destinations.is_empty());
        assert!(config.directions.is_empty());
        assert_eq!(config.max_wait_mins, None);
    }

    #[test]
    fn builder_methods() {
        let config = StopConfig::new(stop())
            .with_fetch_interval_ms(15_000)
            .with_routes(vec!["158".to_string(), "27".to_string()])
            .with_destinations(vec!["new york".to_string()])
            .with_directions(vec!["north".to_string()])
            .with_max_entries(5)
            .with_max_wait_mins(60);

        assert_eq!(config.fetch_interval_ms, 15_000);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.destinations, vec!["new york".to_string()]);
        assert_eq!(config.directions, vec!["north".to_string()]);
        assert_eq!(config.max_entries, 5);
        assert_eq!(config.max_wait_mins, Some(60));
    }

    #[test]
    fn fetch_interval_as_duration() {
        let config = StopConfig::new(stop()).with_fetch_interval_ms(15_000);
        assert_eq!(config.fetch_interval(), Duration::from_secs(15));

        // A zero interval is clamped rather than allowed to spin
        let config = StopConfig::new(stop()).with_fetch_interval_ms(0);
        assert_eq!(config.fetch_interval(), Duration::from_millis(1));
    }

    #[test]
    fn deserialize_minimal() {
        let config: StopConfig = serde_json::from_str(r#"{"stopId": "26229"}"#).unwrap();
        assert_eq!(config.stop_id.as_str(), "26229");
        assert_eq!(config.fetch_interval_ms, 60_000);
        assert_eq!(config.max_entries, 10);
        assert_eq!(config.max_wait_mins, None);
    }

    #[test]
    fn deserialize_full() {
        let config: StopConfig = serde_json::from_str(
            r#"{
                "stopId": "26229",
                "fetchIntervalMs": 30000,
                "routes": ["158"],
                "destinations": ["NEW YORK"],
                "directions": ["north"],
                "maxEntries": 4,
                "maxWaitMins": 45
            }"#,
        )
        .unwrap();

        assert_eq!(config.fetch_interval_ms, 30_000);
        assert_eq!(config.routes, vec!["158".to_string()]);
        assert_eq!(config.max_entries, 4);
        assert_eq!(config.max_wait_mins, Some(45));
    }
}
