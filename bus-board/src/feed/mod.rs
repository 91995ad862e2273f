//! MyBusNow-format prediction feed access.
//!
//! This module provides the HTTP client and parser for the transit
//! agency's stop-prediction feed.
//!
//! Key characteristics of the feed:
//! - a single fixed GET endpoint taking the stop id as a query parameter
//! - loosely structured XML: inconsistent tag casing, optional fields,
//!   and a `pre` element that may appear once or many times
//! - an empty stop is signaled by a `noPredictionMessage` element, not
//!   by an empty prediction list

mod client;
mod error;
mod mock;
mod parse;

pub use client::{FeedClient, FeedConfig, PredictionSource};
pub use error::FeedError;
pub use mock::MockFeedClient;
pub use parse::{ParseError, ParsedPrediction, parse_predictions};
