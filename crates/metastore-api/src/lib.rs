//! Catalog record model: databases, tables, partitions, functions, and
//! indexes, plus the record codec that turns one whole record into compact
//! text and back.
//!
//! Record text is CBOR wrapped in standard base64, so it can sit inside a
//! JSON string without escaping concerns.

pub mod codec;
pub mod error;
pub mod types;

pub use codec::{decode_record, encode_record, CatalogObject};
pub use error::RecordCodecError;
pub use types::{
    Database, FieldSchema, Function, FunctionType, Index, Order, Parameters, Partition,
    PrincipalType, ResourceType, ResourceUri, SerDeInfo, SkewedInfo, StorageDescriptor, Table,
};
