//! Time-to-arrival representation.

use std::fmt;

/// How soon a predicted vehicle arrives.
///
/// The feed reports either a countdown in whole minutes or the textual
/// status "approaching" with no countdown at all. `Approaching` is the
/// minimum of the total order, so sorting predictions ascending puts
/// due-now vehicles first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DueTime {
    /// The vehicle is at or nearly at the stop; the feed gives no countdown.
    Approaching,
    /// Whole minutes until the predicted arrival.
    Minutes(u32),
}

impl DueTime {
    /// Whether this is the due-now case.
    pub fn is_due_now(&self) -> bool {
        matches!(self, DueTime::Approaching)
    }

    /// The flat numeric form used on the wire: the countdown in
    /// minutes, with `-1` standing for `Approaching`.
    pub fn sentinel_minutes(&self) -> i64 {
        match self {
            DueTime::Approaching => -1,
            DueTime::Minutes(m) => i64::from(*m),
        }
    }
}

impl fmt::Display for DueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueTime::Approaching => f.write_str("approaching"),
            DueTime::Minutes(m) => write!(f, "{m} min"),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Approaching is the minimum of the order
        #[test]
        fn approaching_below_any_countdown(m in any::<u32>()) {
            prop_assert!(DueTime::Approaching < DueTime::Minutes(m));
        }

        /// The order on countdowns matches the order on minutes
        #[test]
        fn countdown_order_matches_minutes(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(
                DueTime::Minutes(a).cmp(&DueTime::Minutes(b)),
                a.cmp(&b)
            );
        }

        /// The sentinel form preserves the order
        #[test]
        fn sentinel_preserves_order(a in any::<u32>(), b in any::<u32>()) {
            let (x, y) = (DueTime::Minutes(a), DueTime::Minutes(b));
            prop_assert_eq!(x.cmp(&y), x.sentinel_minutes().cmp(&y.sentinel_minutes()));
            prop_assert!(DueTime::Approaching.sentinel_minutes() < x.sentinel_minutes());
        }
    }
}
