//! Catalog record types.
//!
//! These are the structured objects a catalog mutation touches. They carry no
//! behavior beyond construction helpers; change events embed them whole
//! through [`crate::codec`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form key/value properties attached to most catalog objects.
pub type Parameters = BTreeMap<String, String>;

/// Kind of principal that owns a database or function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalType {
    #[default]
    User,
    Role,
    Group,
}

/// A column (or partition key) definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    /// Type name as written in DDL (e.g. `string`, `map<string,int>`).
    #[serde(rename = "type")]
    pub type_name: String,
    pub comment: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
        }
    }
}

/// Serializer/deserializer configuration for a storage descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerDeInfo {
    pub name: Option<String>,
    pub serialization_lib: Option<String>,
    pub parameters: Parameters,
}

/// Sort column and direction (`1` ascending, `0` descending).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub col: String,
    pub order: i32,
}

/// Skew information for list-bucketed tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkewedInfo {
    pub skewed_col_names: Vec<String>,
    pub skewed_col_values: Vec<Vec<String>>,
    /// Skewed value tuple (joined) → location.
    pub skewed_col_value_location_maps: BTreeMap<String, String>,
}

/// Physical layout of a table, partition, or index table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    pub cols: Vec<FieldSchema>,
    pub location: Option<String>,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub compressed: bool,
    /// `-1` when the table is not bucketed.
    pub num_buckets: i32,
    pub serde_info: SerDeInfo,
    pub bucket_cols: Vec<String>,
    pub sort_cols: Vec<Order>,
    pub parameters: Parameters,
    pub skewed_info: Option<SkewedInfo>,
    pub stored_as_sub_directories: bool,
}

/// A database (namespace for tables and functions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub description: Option<String>,
    pub location_uri: Option<String>,
    pub parameters: Parameters,
    pub owner_name: Option<String>,
    pub owner_type: Option<PrincipalType>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A table definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub table_name: String,
    pub db_name: String,
    pub owner: Option<String>,
    /// Unix seconds.
    pub create_time: i32,
    pub last_access_time: i32,
    pub retention: i32,
    pub sd: StorageDescriptor,
    /// Partition columns in schema order.
    pub partition_keys: Vec<FieldSchema>,
    pub parameters: Parameters,
    pub view_original_text: Option<String>,
    pub view_expanded_text: Option<String>,
    /// `MANAGED_TABLE`, `EXTERNAL_TABLE`, `VIRTUAL_VIEW`, ...
    pub table_type: Option<String>,
    pub temporary: bool,
}

impl Table {
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            db_name: db_name.into(),
            ..Default::default()
        }
    }

    /// Names of the partition keys, in schema order.
    pub fn partition_key_names(&self) -> impl Iterator<Item = &str> {
        self.partition_keys.iter().map(|k| k.name.as_str())
    }
}

/// One partition of a partitioned table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Values positionally matching the owning table's partition keys.
    pub values: Vec<String>,
    pub db_name: String,
    pub table_name: String,
    pub create_time: i32,
    pub last_access_time: i32,
    pub sd: StorageDescriptor,
    pub parameters: Parameters,
}

impl Partition {
    pub fn new<I, S>(db_name: impl Into<String>, table_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            db_name: db_name.into(),
            table_name: table_name.into(),
            ..Default::default()
        }
    }
}

/// Language a user-defined function is implemented in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionType {
    #[default]
    Java,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Jar,
    File,
    Archive,
}

/// A resource (jar, file, archive) a function needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUri {
    pub resource_type: ResourceType,
    pub uri: String,
}

/// A permanent user-defined function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub function_name: String,
    pub db_name: String,
    pub class_name: String,
    pub owner_name: Option<String>,
    pub owner_type: Option<PrincipalType>,
    pub create_time: i32,
    pub function_type: FunctionType,
    pub resource_uris: Vec<ResourceUri>,
}

impl Function {
    pub fn new(
        db_name: impl Into<String>,
        function_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            db_name: db_name.into(),
            class_name: class_name.into(),
            ..Default::default()
        }
    }
}

/// A secondary index over a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub index_name: String,
    pub index_handler_class: String,
    pub db_name: String,
    pub orig_table_name: String,
    pub create_time: i32,
    pub last_access_time: i32,
    pub index_table_name: String,
    pub sd: StorageDescriptor,
    pub parameters: Parameters,
    pub deferred_rebuild: bool,
}

impl Index {
    pub fn new(
        db_name: impl Into<String>,
        orig_table_name: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            db_name: db_name.into(),
            orig_table_name: orig_table_name.into(),
            ..Default::default()
        }
    }
}
