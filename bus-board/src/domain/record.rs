//! Parsed arrival records.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::due::DueTime;

/// A single predicted vehicle arrival at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Route identifier as reported by the feed (e.g. "158").
    pub route_id: String,

    /// Time to arrival.
    pub due: DueTime,

    /// Whether the prediction comes from the timetable rather than a
    /// tracked vehicle.
    pub scheduled: bool,

    /// Destination text with the route identifier stripped and
    /// whitespace trimmed. Empty when the feed omits it.
    pub destination: String,

    /// Route direction text, where the feed provides one.
    pub direction: Option<String>,
}

// The wire shape is flat: `dueMinutes` uses -1 as the due-now sentinel
// and `isDueNow` carries the same fact as a flag.
impl Serialize for Arrival {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Arrival", 6)?;
        s.serialize_field("routeId", &self.route_id)?;
        s.serialize_field("dueMinutes", &self.due.sentinel_minutes())?;
        s.serialize_field("isDueNow", &self.due.is_due_now())?;
        s.serialize_field("isScheduled", &self.scheduled)?;
        s.serialize_field("destination", &self.destination)?;
        s.serialize_field("direction", &self.direction)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_countdown_arrival() {
        let arrival = Arrival {
            route_id: "158".to_string(),
            due: DueTime::Minutes(5),
            scheduled: false,
            destination: "NEW YORK  VIA RIVER ROAD".to_string(),
            direction: None,
        };

        let value = serde_json::to_value(&arrival).unwrap();
        assert_eq!(
            value,
            json!({
                "routeId": "158",
                "dueMinutes": 5,
                "isDueNow": false,
                "isScheduled": false,
                "destination": "NEW YORK  VIA RIVER ROAD",
                "direction": null,
            })
        );
    }

    #[test]
    fn serialize_due_now_uses_sentinel() {
        let arrival = Arrival {
            route_id: "27".to_string(),
            due: DueTime::Approaching,
            scheduled: false,
            destination: "B BLOOMFIELD  VIA BROAD ST STA".to_string(),
            direction: Some("Northbound".to_string()),
        };

        let value = serde_json::to_value(&arrival).unwrap();
        assert_eq!(value["dueMinutes"], json!(-1));
        assert_eq!(value["isDueNow"], json!(true));
        assert_eq!(value["direction"], json!("Northbound"));
    }
}
