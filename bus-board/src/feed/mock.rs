//! Mock feed client for testing without network access.
//!
//! Loads raw prediction documents from XML files and serves them as if
//! they were live feed responses.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::StopId;

use super::client::PredictionSource;
use super::error::FeedError;

/// Mock feed client that serves documents from files.
///
/// Expects files named `{stop_id}.xml` (e.g. `26229.xml`).
#[derive(Debug, Clone)]
pub struct MockFeedClient {
    bodies: HashMap<StopId, String>,
}

impl MockFeedClient {
    /// Create a new mock client by loading XML files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let data_dir = data_dir.as_ref();
        let mut bodies = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| FeedError::Fixture {
            message: format!("failed to read fixture directory {data_dir:?}: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| FeedError::Fixture {
                message: format!("failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("xml") {
                continue;
            }

            // Extract the stop id from the filename ("26229.xml" -> "26229")
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FeedError::Fixture {
                    message: format!("invalid fixture filename: {path:?}"),
                })?;

            let stop = StopId::parse(stem).map_err(|e| FeedError::Fixture {
                message: format!("invalid stop id in fixture filename {path:?}: {e}"),
            })?;

            let body = std::fs::read_to_string(&path).map_err(|e| FeedError::Fixture {
                message: format!("failed to read {path:?}: {e}"),
            })?;

            bodies.insert(stop, body);
        }

        if bodies.is_empty() {
            return Err(FeedError::Fixture {
                message: format!("no fixture files found in {data_dir:?}"),
            });
        }

        Ok(Self { bodies })
    }

    /// List the stops the mock has fixtures for.
    pub fn available_stops(&self) -> Vec<StopId> {
        self.bodies.keys().cloned().collect()
    }
}

#[async_trait]
impl PredictionSource for MockFeedClient {
    async fn fetch_predictions(&self, stop: &StopId) -> Result<String, FeedError> {
        self.bodies.get(stop).cloned().ok_or_else(|| FeedError::Api {
            status: 404,
            message: format!(
                "no fixture for stop {stop}; available: {:?}",
                self.bodies.keys().map(StopId::as_str).collect::<Vec<_>>()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn serves_fixture_bodies() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "26229.xml", "<stop/>");
        write_fixture(dir.path(), "30189.xml", "<stop><pre/></stop>");
        write_fixture(dir.path(), "notes.txt", "not a fixture");

        let client = MockFeedClient::new(dir.path()).unwrap();
        assert_eq!(client.available_stops().len(), 2);

        let body = client
            .fetch_predictions(&StopId::parse("26229").unwrap())
            .await
            .unwrap();
        assert_eq!(body, "<stop/>");
    }

    #[tokio::test]
    async fn unknown_stop_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "26229.xml", "<stop/>");

        let client = MockFeedClient::new(dir.path()).unwrap();
        let result = client
            .fetch_predictions(&StopId::parse("99999").unwrap())
            .await;

        assert!(matches!(result, Err(FeedError::Api { status: 404, .. })));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MockFeedClient::new(dir.path());
        assert!(matches!(result, Err(FeedError::Fixture { .. })));
    }

    #[test]
    fn invalid_stop_id_filename_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "not a stop.xml", "<stop/>");

        let result = MockFeedClient::new(dir.path());
        assert!(matches!(result, Err(FeedError::Fixture { .. })));
    }
}
