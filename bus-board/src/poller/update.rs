//! Outbound notification payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Arrival, StopId};

/// A notification from a poller to the host/display collaborator.
///
/// Delivered over the registry's update channel. Both variants
/// serialize to JSON, so a host transport can forward them verbatim.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StopUpdate {
    /// A successful fetch.
    #[serde(rename_all = "camelCase")]
    Events {
        stop_id: StopId,
        /// Sorted ascending by due time and truncated to the configured
        /// maximum; consumers need not re-sort or re-bound.
        events: Vec<Arrival>,
        /// When the events were fetched. `None` only when a
        /// re-registration re-broadcasts a cache that was never filled.
        fetched_at: Option<DateTime<Utc>>,
    },
    /// A failed fetch: transport failure or an unusable document.
    #[serde(rename_all = "camelCase")]
    FetchFailed { stop_id: StopId, error: String },
}

impl StopUpdate {
    /// The stop this update concerns.
    pub fn stop_id(&self) -> &StopId {
        match self {
            StopUpdate::Events { stop_id, .. } => stop_id,
            StopUpdate::FetchFailed { stop_id, .. } => stop_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DueTime;

    #[test]
    fn events_serialize_with_type_tag() {
        let update = StopUpdate::Events {
            stop_id: StopId::parse("26229").unwrap(),
            events: vec![Arrival {
                route_id: "158".to_string(),
                due: DueTime::Minutes(5),
                scheduled: false,
                destination: "NEW YORK".to_string(),
                direction: None,
            }],
            fetched_at: None,
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "events");
        assert_eq!(value["stopId"], "26229");
        assert_eq!(value["events"][0]["routeId"], "158");
    }

    #[test]
    fn failure_serializes_with_type_tag() {
        let update = StopUpdate::FetchFailed {
            stop_id: StopId::parse("26229").unwrap(),
            error: "feed error 503: unavailable".to_string(),
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "fetchFailed");
        assert_eq!(value["error"], "feed error 503: unavailable");
    }

    #[test]
    fn stop_id_accessor() {
        let update = StopUpdate::FetchFailed {
            stop_id: StopId::parse("30189").unwrap(),
            error: "x".to_string(),
        };
        assert_eq!(update.stop_id().as_str(), "30189");
    }
}
