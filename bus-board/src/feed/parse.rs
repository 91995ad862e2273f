//! Prediction document parsing.
//!
//! The feed returns loosely structured XML: tag casing is inconsistent,
//! most fields are optional, and a `pre` element may appear once or many
//! times. Parsing therefore never fails as a whole: every structural
//! anomaly becomes an error record in the output, and a bad entry never
//! takes its siblings down with it.

use roxmltree::{Document, Node};

use crate::domain::{Arrival, DueTime};

/// How much of an unparseable document to echo back for diagnosis.
const ECHO_LIMIT: usize = 200;

/// A prediction document or entry that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable diagnosis of the missing or malformed element.
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

/// One parsed entry of a prediction document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPrediction {
    /// A well-formed predicted arrival.
    Arrival(Arrival),
    /// A document-level or entry-level structural failure.
    Error(ParseError),
}

impl ParsedPrediction {
    /// Whether this entry is an error record.
    pub fn is_error(&self) -> bool {
        matches!(self, ParsedPrediction::Error(_))
    }
}

/// Parse a raw prediction document into arrival and error records.
///
/// Always returns at least one record. Document-level failures (input
/// that is not XML, a missing `stop` root, the feed's "no predictions"
/// message, a missing `pre` list) yield a single error record for the
/// whole document. A malformed `pre` entry yields an error record in
/// place of that entry only.
///
/// Tag names are matched case-insensitively and attributes are ignored,
/// matching the feed's loose formatting.
pub fn parse_predictions(xml: &str) -> Vec<ParsedPrediction> {
    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            let echo: String = xml.chars().take(ECHO_LIMIT).collect();
            return vec![ParsedPrediction::Error(ParseError::new(format!(
                "could not parse XML ({e}) from input {echo:?}"
            )))];
        }
    };

    let root = doc.root_element();
    if !root.tag_name().name().eq_ignore_ascii_case("stop") {
        return vec![ParsedPrediction::Error(ParseError::new(
            "XML has no \"stop\" tag",
        ))];
    }

    // The feed signals an empty stop with a message element rather than
    // an empty prediction list.
    if let Some(message) = child_text(root, "noPredictionMessage") {
        return vec![ParsedPrediction::Error(ParseError::new(message))];
    }

    let entries: Vec<ParsedPrediction> = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("pre"))
        .map(parse_entry)
        .collect();

    if entries.is_empty() {
        return vec![ParsedPrediction::Error(ParseError::new(
            "XML has no \"pre\" tag",
        ))];
    }

    entries
}

/// Parse a single `pre` element into an arrival or an error record.
fn parse_entry(pre: Node) -> ParsedPrediction {
    let Some(route) = child_text(pre, "rn") else {
        return ParsedPrediction::Error(ParseError::new(
            "XML has no \"rn\" tag (route number)",
        ));
    };
    let Some(scheduled) = child_text(pre, "scheduled") else {
        return ParsedPrediction::Error(ParseError::new(
            "XML has no \"scheduled\" tag (scheduled or tracked time)",
        ));
    };

    let countdown = child_text(pre, "pt");
    let status = child_text(pre, "pu");
    if countdown.is_none() && status.is_none() {
        return ParsedPrediction::Error(ParseError::new(
            "XML has no \"pt\" or \"pu\" tag (time)",
        ));
    }

    let due = if status.is_some_and(|s| s.eq_ignore_ascii_case("approaching")) {
        DueTime::Approaching
    } else {
        match countdown {
            Some(text) => match text.parse::<u32>() {
                Ok(minutes) => DueTime::Minutes(minutes),
                Err(_) => {
                    return ParsedPrediction::Error(ParseError::new(format!(
                        "\"pt\" tag is not a number: {text:?}"
                    )));
                }
            },
            // A status other than "approaching" with no countdown gives
            // us nothing to show.
            None => {
                return ParsedPrediction::Error(ParseError::new(format!(
                    "\"pu\" tag is {:?} and there is no \"pt\" countdown",
                    status.unwrap_or_default()
                )));
            }
        }
    };

    // The destination text usually embeds the route number; strip its
    // first occurrence so "NEW YORK 158 VIA RIVER ROAD" reads as a
    // destination, not a route listing.
    let destination = child_text(pre, "fd")
        .map(|fd| fd.replacen(route, "", 1).trim().to_string())
        .unwrap_or_default();

    ParsedPrediction::Arrival(Arrival {
        route_id: route.to_string(),
        due,
        scheduled: scheduled.eq_ignore_ascii_case("true"),
        destination,
        direction: child_text(pre, "rd").map(str::to_string),
    })
}

/// Trimmed text of the first child element with the given name, matched
/// case-insensitively. An element that is absent or has only whitespace
/// text counts as missing; the feed is fond of emitting empty tags.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name().eq_ignore_ascii_case(name))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
