//! The message model: metadata plus one kind-specific body.

use metastore_api::{CatalogObject, Function, Index, Partition, Table};

use crate::embedded::Embedded;
use crate::error::{MessagingError, Result};
use crate::event::EventKind;
use crate::json::keys;

// ============================================================================
// PartitionKeyValues
// ============================================================================

/// Ordered partition-key name → value mapping.
///
/// Order follows insertion, which for built messages is the table's
/// partition-key schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionKeyValues(Vec<(String, String)>);

impl PartitionKeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PartitionKeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

// ============================================================================
// Message
// ============================================================================

/// One catalog change event.
///
/// Built by [`crate::JsonMessageFactory`], serialized with
/// [`crate::serialize_message`], and read back with
/// [`crate::JsonMessageDeserializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Catalog server identity.
    pub server: String,
    /// Service principal the server runs as.
    pub principal: String,
    /// Unix time in whole seconds.
    pub timestamp: i64,
    pub body: MessageBody,
}

/// Kind-specific message fields.
///
/// Drop events for databases, tables, and partitions carry names only. Drop
/// events for functions and indexes carry the whole object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    CreateDatabase {
        db_name: String,
    },
    DropDatabase {
        db_name: String,
    },
    CreateTable {
        table: Embedded<Table>,
    },
    /// Only the post-alter table is kept.
    AlterTable {
        table: Embedded<Table>,
    },
    DropTable {
        db_name: String,
        table_name: String,
    },
    AddPartition {
        table: Embedded<Table>,
        partitions: Vec<Embedded<Partition>>,
    },
    AlterPartition {
        table: Embedded<Table>,
        before: Embedded<Partition>,
        after: Embedded<Partition>,
    },
    DropPartition {
        db_name: String,
        table_name: String,
        partitions: Vec<PartitionKeyValues>,
    },
    CreateFunction {
        function: Embedded<Function>,
    },
    DropFunction {
        function: Embedded<Function>,
    },
    CreateIndex {
        index: Embedded<Index>,
    },
    DropIndex {
        index: Embedded<Index>,
    },
    AlterIndex {
        before: Embedded<Index>,
        after: Embedded<Index>,
    },
    Insert {
        db_name: String,
        table_name: String,
        partition_key_values: PartitionKeyValues,
        files: Vec<String>,
    },
}

impl MessageBody {
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::CreateDatabase { .. } => EventKind::CreateDatabase,
            Self::DropDatabase { .. } => EventKind::DropDatabase,
            Self::CreateTable { .. } => EventKind::CreateTable,
            Self::AlterTable { .. } => EventKind::AlterTable,
            Self::DropTable { .. } => EventKind::DropTable,
            Self::AddPartition { .. } => EventKind::AddPartition,
            Self::AlterPartition { .. } => EventKind::AlterPartition,
            Self::DropPartition { .. } => EventKind::DropPartition,
            Self::CreateFunction { .. } => EventKind::CreateFunction,
            Self::DropFunction { .. } => EventKind::DropFunction,
            Self::CreateIndex { .. } => EventKind::CreateIndex,
            Self::DropIndex { .. } => EventKind::DropIndex,
            Self::AlterIndex { .. } => EventKind::AlterIndex,
            Self::Insert { .. } => EventKind::Insert,
        }
    }
}

fn decode_field<T: CatalogObject>(embedded: &Embedded<T>, field: &str) -> Result<T> {
    embedded.decode().map_err(|source| MessagingError::InnerDecode {
        field: field.to_string(),
        source,
    })
}

impl Message {
    pub fn event_kind(&self) -> EventKind {
        self.body.event_kind()
    }

    /// Database name, for kinds that carry it as a plain field.
    pub fn db_name(&self) -> Option<&str> {
        match &self.body {
            MessageBody::CreateDatabase { db_name }
            | MessageBody::DropDatabase { db_name }
            | MessageBody::DropTable { db_name, .. }
            | MessageBody::DropPartition { db_name, .. }
            | MessageBody::Insert { db_name, .. } => Some(db_name),
            _ => None,
        }
    }

    /// Table name, for kinds that carry it as a plain field.
    pub fn table_name(&self) -> Option<&str> {
        match &self.body {
            MessageBody::DropTable { table_name, .. }
            | MessageBody::DropPartition { table_name, .. }
            | MessageBody::Insert { table_name, .. } => Some(table_name),
            _ => None,
        }
    }

    /// Decode the embedded table.
    pub fn table_obj(&self) -> Result<Table> {
        match &self.body {
            MessageBody::CreateTable { table }
            | MessageBody::AlterTable { table }
            | MessageBody::AddPartition { table, .. }
            | MessageBody::AlterPartition { table, .. } => decode_field(table, keys::TABLE_OBJ),
            _ => Err(MessagingError::missing(keys::TABLE_OBJ)),
        }
    }

    /// Decode every embedded partition of an add-partition message, in order.
    pub fn partition_objs(&self) -> Result<Vec<Partition>> {
        match &self.body {
            MessageBody::AddPartition { partitions, .. } => partitions
                .iter()
                .map(|p| decode_field(p, keys::PARTITION_LIST))
                .collect(),
            _ => Err(MessagingError::missing(keys::PARTITION_LIST)),
        }
    }

    pub fn partition_obj_before(&self) -> Result<Partition> {
        match &self.body {
            MessageBody::AlterPartition { before, .. } => {
                decode_field(before, keys::PARTITION_OBJ_BEFORE)
            }
            _ => Err(MessagingError::missing(keys::PARTITION_OBJ_BEFORE)),
        }
    }

    pub fn partition_obj_after(&self) -> Result<Partition> {
        match &self.body {
            MessageBody::AlterPartition { after, .. } => {
                decode_field(after, keys::PARTITION_OBJ_AFTER)
            }
            _ => Err(MessagingError::missing(keys::PARTITION_OBJ_AFTER)),
        }
    }

    /// Partition key/value mappings of a drop-partition message.
    pub fn partition_key_values_list(&self) -> Result<&[PartitionKeyValues]> {
        match &self.body {
            MessageBody::DropPartition { partitions, .. } => Ok(partitions),
            _ => Err(MessagingError::missing(keys::PARTITION_KEY_VALUES_ARRAY)),
        }
    }

    pub fn function_obj(&self) -> Result<Function> {
        match &self.body {
            MessageBody::CreateFunction { function } | MessageBody::DropFunction { function } => {
                decode_field(function, keys::FUNCTION_OBJ)
            }
            _ => Err(MessagingError::missing(keys::FUNCTION_OBJ)),
        }
    }

    pub fn index_obj(&self) -> Result<Index> {
        match &self.body {
            MessageBody::CreateIndex { index } | MessageBody::DropIndex { index } => {
                decode_field(index, keys::INDEX_OBJ)
            }
            _ => Err(MessagingError::missing(keys::INDEX_OBJ)),
        }
    }

    pub fn index_obj_before(&self) -> Result<Index> {
        match &self.body {
            MessageBody::AlterIndex { before, .. } => decode_field(before, keys::INDEX_OBJ_BEFORE),
            _ => Err(MessagingError::missing(keys::INDEX_OBJ_BEFORE)),
        }
    }

    pub fn index_obj_after(&self) -> Result<Index> {
        match &self.body {
            MessageBody::AlterIndex { after, .. } => decode_field(after, keys::INDEX_OBJ_AFTER),
            _ => Err(MessagingError::missing(keys::INDEX_OBJ_AFTER)),
        }
    }
}
