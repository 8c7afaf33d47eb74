//! Error types for the feed-to-KML pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a pipeline run.
///
/// Nothing in the pipeline retries; each variant propagates to the caller
/// as soon as it occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Connection failure, timeout or non-success HTTP status.
    #[error("failed to fetch feed from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The source could not be turned into a request URL.
    #[error("invalid source URL {url}: {reason}")]
    InvalidSource { url: String, reason: String },

    /// A station element has no element for one of the known fields.
    #[error("station at index {index} is missing field `{field}`")]
    MissingField { field: String, index: usize },

    /// Feed payload is not UTF-8.
    #[error("feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Feed payload is not well-formed XML.
    #[error("feed is not valid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// KML serialization failed.
    #[error("failed to serialize KML: {0}")]
    Serialize(#[from] quick_xml::Error),

    #[error("serialized KML is not valid UTF-8: {0}")]
    OutputEncoding(#[from] std::string::FromUtf8Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Reading a local source or writing a target failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts_to_json_variant() {
        let err: PipelineError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PipelineError::Json(_)));
    }

    #[test]
    fn test_client_build_error_message() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = PipelineError::ClientBuild(source);
        assert!(err.to_string().starts_with("failed to build HTTP client"));
    }

    #[test]
    fn test_output_encoding_error_converts() {
        let err: PipelineError = String::from_utf8(vec![0xFF]).unwrap_err().into();
        assert!(matches!(err, PipelineError::OutputEncoding(_)));
    }
}
