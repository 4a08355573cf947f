use thiserror::Error;

/// Failure of the record codec. Both directions surface through this one type.
#[derive(Debug, Error)]
pub enum RecordCodecError {
    #[error("CBOR encode error: {0}")]
    Encode(String),

    #[error("CBOR decode error: {0}")]
    Decode(String),

    #[error("Invalid base64 record text: {0}")]
    InvalidBase64(String),
}
