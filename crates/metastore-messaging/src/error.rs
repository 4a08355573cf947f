use metastore_api::RecordCodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid message envelope: expected object")]
    NotAnObject,

    #[error("Invalid message envelope: missing {field}")]
    MissingField { field: String },

    #[error("Invalid message envelope: {field} is not {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("Failed to encode {field}: {source}")]
    InnerEncode {
        field: &'static str,
        #[source]
        source: RecordCodecError,
    },

    #[error("Failed to decode {field}: {source}")]
    InnerDecode {
        field: String,
        #[source]
        source: RecordCodecError,
    },

    #[error("Partition has {got} values but table has {expected} partition keys")]
    PartitionKeyMismatch { expected: usize, got: usize },

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Unexpected event type: expected {expected}, got {got}")]
    UnexpectedEventType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Unsupported message format {format} version {version}")]
    UnsupportedFormat { format: String, version: String },
}

impl MessagingError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, MessagingError>;
