//! Arrival filtering, ordering and bounding.
//!
//! Pure functions over parsed arrivals. A record is excluded if ANY
//! active criterion excludes it; survivors are stably sorted by time to
//! arrival and truncated to the configured maximum, so consumers never
//! need to re-sort or re-bound.

use crate::domain::{Arrival, DueTime};
use crate::poller::StopConfig;

/// Apply the configured exclusions, sort ascending by due time and
/// truncate to `max_entries`.
///
/// Applying the pipeline to its own output returns it unchanged.
pub fn apply(records: Vec<Arrival>, config: &StopConfig) -> Vec<Arrival> {
    let mut kept: Vec<Arrival> = records
        .into_iter()
        .filter(|record| !excluded(record, config))
        .collect();

    // sort_by_key is stable: ties keep their feed order
    kept.sort_by_key(|record| record.due);
    kept.truncate(config.max_entries);
    kept
}

/// Whether any active criterion excludes this record.
fn excluded(record: &Arrival, config: &StopConfig) -> bool {
    exceeds_max_wait(record, config)
        || route_not_allowed(record, config)
        || destination_not_wanted(record, config)
        || direction_not_wanted(record, config)
}

/// Exclude if the countdown is beyond the configured limit. An
/// approaching vehicle has no countdown and is never excluded here.
fn exceeds_max_wait(record: &Arrival, config: &StopConfig) -> bool {
    match (config.max_wait_mins, record.due) {
        (Some(max), DueTime::Minutes(minutes)) => minutes > max,
        _ => false,
    }
}

/// Exclude a route unless it equals a configured value exactly.
/// Substring matching would produce false positives: some route ids
/// are substrings of others, e.g. "42" and "42x".
fn route_not_allowed(record: &Arrival, config: &StopConfig) -> bool {
    if config.routes.is_empty() {
        return false;
    }
    !config
        .routes
        .iter()
        .any(|route| route.eq_ignore_ascii_case(&record.route_id))
}

/// Exclude a destination unless it contains a configured value.
fn destination_not_wanted(record: &Arrival, config: &StopConfig) -> bool {
    if config.destinations.is_empty() {
        return false;
    }
    !config
        .destinations
        .iter()
        .any(|wanted| contains_ignore_case(&record.destination, wanted))
}

/// Direction filtering only applies to records the feed tagged with a
/// direction; untagged records are never excluded here.
fn direction_not_wanted(record: &Arrival, config: &StopConfig) -> bool {
    if config.directions.is_empty() {
        return false;
    }
    match &record.direction {
        Some(direction) => !config
            .directions
            .iter()
            .any(|wanted| contains_ignore_case(direction, wanted)),
        None => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
