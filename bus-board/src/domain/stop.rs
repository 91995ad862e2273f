//! Stop identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// A validated transit-agency stop identifier.
///
/// Stop ids are interpolated verbatim into the prediction endpoint's
/// query string, so this type guarantees by construction that the value
/// is non-empty ASCII alphanumeric text. Bus stop ids are numeric;
/// light-rail and rail stops use short letter codes.
///
/// # Examples
///
/// ```
/// use bus_board::domain::StopId;
///
/// let stop = StopId::parse("26229").unwrap();
/// assert_eq!(stop.as_str(), "26229");
///
/// // Whitespace and punctuation are rejected
/// assert!(StopId::parse("262 29").is_err());
/// assert!(StopId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    ///
    /// The input must be non-empty and consist only of ASCII letters and
    /// digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        for b in s.bytes() {
            if !b.is_ascii_alphanumeric() {
                return Err(InvalidStopId {
                    reason: "must contain only ASCII letters and digits",
                });
            }
        }

        Ok(StopId(s.to_string()))
    }

    /// Returns the stop id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StopId::parse(&s)
    }
}

impl From<StopId> for String {
    fn from(stop: StopId) -> String {
        stop.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating valid stop ids.
    fn valid_stop_id() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Za-z0-9]{1,10}").unwrap()
    }

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in valid_stop_id()) {
            let stop = StopId::parse(&s).unwrap();
            prop_assert_eq!(stop.as_str(), s.as_str());
        }

        /// Any non-empty alphanumeric string parses
        #[test]
        fn valid_always_parses(s in valid_stop_id()) {
            prop_assert!(StopId::parse(&s).is_ok());
        }

        /// Strings containing non-alphanumeric bytes are rejected
        #[test]
        fn punctuation_rejected(s in "[A-Za-z0-9]{0,4}[ \\-_.:/?][A-Za-z0-9]{0,4}") {
            prop_assert!(StopId::parse(&s).is_err());
        }
    }
}
