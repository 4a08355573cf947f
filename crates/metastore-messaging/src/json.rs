//! JSON envelope codec.
//!
//! Write: `Message` → JSON object with fixed keys per event kind. Embedded
//! records are written as JSON strings holding record text, never as nested
//! JSON.
//!
//! Read: envelope bytes → [`JsonTree`] → typed extractors that decode the
//! embedded record text.

use metastore_api::{decode_record, CatalogObject, Function, Index, Partition, Table};
use serde_json::{Map, Value};

use crate::embedded::Embedded;
use crate::error::{MessagingError, Result};
use crate::message::{Message, MessageBody, PartitionKeyValues};

/// A parsed envelope: the top-level JSON object.
pub type JsonTree = Map<String, Value>;

/// Envelope key names.
pub mod keys {
    pub const SERVER: &str = "server";
    pub const PRINCIPAL: &str = "principal";
    pub const TIMESTAMP: &str = "timestamp";
    pub const EVENT_TYPE: &str = "eventType";
    pub const DB_NAME: &str = "dbName";
    pub const TABLE_NAME: &str = "tableName";
    pub const TABLE_OBJ: &str = "tableObjJson";
    pub const PARTITION_LIST: &str = "partitionListJson";
    pub const PARTITION_OBJ_BEFORE: &str = "partitionObjBeforeJson";
    pub const PARTITION_OBJ_AFTER: &str = "partitionObjAfterJson";
    pub const PARTITION_KEY_VALUES_ARRAY: &str = "partitionKeyValuesArray";
    pub const PARTITION_KEY_VALUES: &str = "partitionKeyValues";
    pub const FILES: &str = "files";
    pub const FUNCTION_OBJ: &str = "functionObjJson";
    pub const INDEX_OBJ: &str = "indexObjJson";
    pub const INDEX_OBJ_BEFORE: &str = "indexObjBeforeJson";
    pub const INDEX_OBJ_AFTER: &str = "indexObjAfterJson";
}

// ============================================================================
// Serialize
// ============================================================================

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn embedded<T>(e: &Embedded<T>) -> Value {
    string(e.as_str())
}

fn key_values(kv: &PartitionKeyValues) -> Value {
    Value::Object(kv.iter().map(|(k, v)| (k.to_string(), string(v))).collect())
}

/// Build the envelope object for a message.
pub fn to_json_tree(message: &Message) -> JsonTree {
    let mut obj = Map::new();
    obj.insert(keys::SERVER.to_string(), string(&message.server));
    obj.insert(keys::PRINCIPAL.to_string(), string(&message.principal));
    obj.insert(keys::TIMESTAMP.to_string(), Value::from(message.timestamp));
    obj.insert(
        keys::EVENT_TYPE.to_string(),
        string(message.event_kind().as_str()),
    );

    let mut put = |key: &str, value: Value| {
        obj.insert(key.to_string(), value);
    };

    match &message.body {
        MessageBody::CreateDatabase { db_name } | MessageBody::DropDatabase { db_name } => {
            put(keys::DB_NAME, string(db_name));
        }
        MessageBody::CreateTable { table } | MessageBody::AlterTable { table } => {
            put(keys::TABLE_OBJ, embedded(table));
        }
        MessageBody::DropTable {
            db_name,
            table_name,
        } => {
            put(keys::DB_NAME, string(db_name));
            put(keys::TABLE_NAME, string(table_name));
        }
        MessageBody::AddPartition { table, partitions } => {
            put(keys::TABLE_OBJ, embedded(table));
            put(
                keys::PARTITION_LIST,
                Value::Array(partitions.iter().map(embedded).collect()),
            );
        }
        MessageBody::AlterPartition {
            table,
            before,
            after,
        } => {
            put(keys::TABLE_OBJ, embedded(table));
            put(keys::PARTITION_OBJ_BEFORE, embedded(before));
            put(keys::PARTITION_OBJ_AFTER, embedded(after));
        }
        MessageBody::DropPartition {
            db_name,
            table_name,
            partitions,
        } => {
            put(keys::DB_NAME, string(db_name));
            put(keys::TABLE_NAME, string(table_name));
            put(
                keys::PARTITION_KEY_VALUES_ARRAY,
                Value::Array(partitions.iter().map(key_values).collect()),
            );
        }
        MessageBody::CreateFunction { function } | MessageBody::DropFunction { function } => {
            put(keys::FUNCTION_OBJ, embedded(function));
        }
        MessageBody::CreateIndex { index } | MessageBody::DropIndex { index } => {
            put(keys::INDEX_OBJ, embedded(index));
        }
        MessageBody::AlterIndex { before, after } => {
            put(keys::INDEX_OBJ_BEFORE, embedded(before));
            put(keys::INDEX_OBJ_AFTER, embedded(after));
        }
        MessageBody::Insert {
            db_name,
            table_name,
            partition_key_values,
            files,
        } => {
            put(keys::DB_NAME, string(db_name));
            put(keys::TABLE_NAME, string(table_name));
            put(keys::PARTITION_KEY_VALUES, key_values(partition_key_values));
            put(
                keys::FILES,
                Value::Array(files.iter().map(|f| string(f)).collect()),
            );
        }
    }
    obj
}

/// Serialize a message to its JSON envelope text.
pub fn serialize_message(message: &Message) -> String {
    Value::Object(to_json_tree(message)).to_string()
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serialize_message(self))
    }
}

// ============================================================================
// Parse
// ============================================================================

/// Parse envelope bytes into a JSON tree.
///
/// # Errors
/// `InvalidJson` if the bytes are not JSON, `NotAnObject` if the top level
/// is not an object.
pub fn get_json_tree(envelope: &[u8]) -> Result<JsonTree> {
    match serde_json::from_slice::<Value>(envelope)? {
        Value::Object(obj) => Ok(obj),
        _ => Err(MessagingError::NotAnObject),
    }
}

pub(crate) fn get_str<'a>(tree: &'a JsonTree, key: &str) -> Result<&'a str> {
    tree.get(key)
        .ok_or_else(|| MessagingError::missing(key))?
        .as_str()
        .ok_or_else(|| MessagingError::invalid(key, "a string"))
}

pub(crate) fn get_i64(tree: &JsonTree, key: &str) -> Result<i64> {
    tree.get(key)
        .ok_or_else(|| MessagingError::missing(key))?
        .as_i64()
        .ok_or_else(|| MessagingError::invalid(key, "an integer"))
}

pub(crate) fn get_str_array<'a>(tree: &'a JsonTree, key: &str) -> Result<Vec<&'a str>> {
    tree.get(key)
        .ok_or_else(|| MessagingError::missing(key))?
        .as_array()
        .ok_or_else(|| MessagingError::invalid(key, "an array of strings"))?
        .iter()
        .map(|v| {
            v.as_str()
                .ok_or_else(|| MessagingError::invalid(key, "an array of strings"))
        })
        .collect()
}

fn to_key_values(value: &Value, key: &str) -> Result<PartitionKeyValues> {
    let obj = value
        .as_object()
        .ok_or_else(|| MessagingError::invalid(key, "a string map"))?;
    obj.iter()
        .map(|(k, v)| {
            v.as_str()
                .map(|v| (k.as_str(), v))
                .ok_or_else(|| MessagingError::invalid(key, "a string map"))
        })
        .collect()
}

pub(crate) fn get_key_values(tree: &JsonTree, key: &str) -> Result<PartitionKeyValues> {
    let value = tree.get(key).ok_or_else(|| MessagingError::missing(key))?;
    to_key_values(value, key)
}

pub(crate) fn get_key_values_array(
    tree: &JsonTree,
    key: &str,
) -> Result<Vec<PartitionKeyValues>> {
    tree.get(key)
        .ok_or_else(|| MessagingError::missing(key))?
        .as_array()
        .ok_or_else(|| MessagingError::invalid(key, "an array of string maps"))?
        .iter()
        .map(|v| to_key_values(v, key))
        .collect()
}

// ============================================================================
// Extractors
// ============================================================================

fn decode_text<T: CatalogObject>(text: &str, key: &str) -> Result<T> {
    decode_record(text).map_err(|source| MessagingError::InnerDecode {
        field: key.to_string(),
        source,
    })
}

fn extract<T: CatalogObject>(tree: &JsonTree, key: &str) -> Result<T> {
    get_str(tree, key)
        .and_then(|text| decode_text(text, key))
        .inspect_err(|e| tracing::debug!(field = key, error = %e, "envelope extraction failed"))
}

/// Decode the table under `tableObjJson`.
pub fn get_table_obj(tree: &JsonTree) -> Result<Table> {
    extract(tree, keys::TABLE_OBJ)
}

/// Decode every partition under `partitionListJson`, in array order.
///
/// Each element decodes into its own value. Fails as a whole if any element
/// is missing, mistyped, or undecodable.
pub fn get_partition_obj_list(tree: &JsonTree) -> Result<Vec<Partition>> {
    let key = keys::PARTITION_LIST;
    tree.get(key)
        .ok_or_else(|| MessagingError::missing(key))
        .and_then(|value| {
            value
                .as_array()
                .ok_or_else(|| MessagingError::invalid(key, "an array of strings"))
        })
        .and_then(|elements| {
            elements
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    let field = format!("{}[{}]", key, i);
                    element
                        .as_str()
                        .ok_or_else(|| MessagingError::invalid(&field, "a string"))
                        .and_then(|text| decode_text(text, &field))
                })
                .collect()
        })
        .inspect_err(|e| tracing::debug!(field = key, error = %e, "envelope extraction failed"))
}

/// Decode a single partition stored under `key`
/// (`partitionObjBeforeJson` or `partitionObjAfterJson`).
pub fn get_partition_obj(tree: &JsonTree, key: &str) -> Result<Partition> {
    extract(tree, key)
}

/// Decode the function under `functionObjJson`.
pub fn get_function_obj(tree: &JsonTree) -> Result<Function> {
    extract(tree, keys::FUNCTION_OBJ)
}

/// Decode the index under `indexObjJson`.
pub fn get_index_obj(tree: &JsonTree) -> Result<Index> {
    get_index_obj_with_key(tree, keys::INDEX_OBJ)
}

/// Decode the index under `key`. Alter-index envelopes use
/// `indexObjBeforeJson` and `indexObjAfterJson`.
pub fn get_index_obj_with_key(tree: &JsonTree, key: &str) -> Result<Index> {
    extract(tree, key)
}
