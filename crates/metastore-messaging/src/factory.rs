//! Message factory: one builder per event kind.

use std::fmt;
use std::sync::Arc;

use metastore_api::{CatalogObject, Database, Function, Index, Partition, Table};

use crate::config::MessagingConfig;
use crate::deserializer::JsonMessageDeserializer;
use crate::embedded::Embedded;
use crate::error::{MessagingError, Result};
use crate::json::keys;
use crate::message::{Message, MessageBody, PartitionKeyValues};
use crate::{MESSAGE_FORMAT, MESSAGE_VERSION};

/// Source of message timestamps in Unix seconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Builds JSON-format messages for catalog mutations.
///
/// Holds only immutable configuration, so one factory can be shared across
/// threads.
#[derive(Clone)]
pub struct JsonMessageFactory {
    config: MessagingConfig,
    /// Defaults to the wall clock if `None`.
    clock: Option<Clock>,
}

impl fmt::Debug for JsonMessageFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonMessageFactory")
            .field("config", &self.config)
            .field("clock", &self.clock.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Pair a table's partition-key names with a partition's values, in schema order.
///
/// # Errors
/// `PartitionKeyMismatch` if the partition does not have exactly one value
/// per partition key.
pub fn partition_key_values(table: &Table, partition: &Partition) -> Result<PartitionKeyValues> {
    if table.partition_keys.len() != partition.values.len() {
        return Err(MessagingError::PartitionKeyMismatch {
            expected: table.partition_keys.len(),
            got: partition.values.len(),
        });
    }
    Ok(table
        .partition_key_names()
        .zip(partition.values.iter().map(String::as_str))
        .collect())
}

fn embed<T: CatalogObject>(record: &T, field: &'static str) -> Result<Embedded<T>> {
    Embedded::encode(record).map_err(|source| MessagingError::InnerEncode { field, source })
}

impl JsonMessageFactory {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            config,
            clock: None,
        }
    }

    /// Replace the wall clock, e.g. for deterministic timestamps in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Message format version.
    pub fn version(&self) -> &'static str {
        MESSAGE_VERSION
    }

    /// Message format name.
    pub fn message_format(&self) -> &'static str {
        MESSAGE_FORMAT
    }

    /// Deserializer matching this factory's format.
    pub fn deserializer(&self) -> JsonMessageDeserializer {
        JsonMessageDeserializer
    }

    fn now(&self) -> i64 {
        match &self.clock {
            Some(clock) => clock(),
            None => chrono::Utc::now().timestamp(),
        }
    }

    fn message(&self, body: MessageBody) -> Message {
        let message = Message {
            server: self.config.server_url.clone(),
            principal: self.config.service_principal.clone(),
            timestamp: self.now(),
            body,
        };
        tracing::debug!(
            event_type = message.event_kind().as_str(),
            timestamp = message.timestamp,
            "built catalog message"
        );
        message
    }

    pub fn build_create_database_message(&self, db: &Database) -> Result<Message> {
        Ok(self.message(MessageBody::CreateDatabase {
            db_name: db.name.clone(),
        }))
    }

    pub fn build_drop_database_message(&self, db: &Database) -> Result<Message> {
        Ok(self.message(MessageBody::DropDatabase {
            db_name: db.name.clone(),
        }))
    }

    pub fn build_create_table_message(&self, table: &Table) -> Result<Message> {
        Ok(self.message(MessageBody::CreateTable {
            table: embed(table, keys::TABLE_OBJ)?,
        }))
    }

    /// Only `after` is embedded. Callers that need the prior definition must
    /// keep `before` themselves.
    pub fn build_alter_table_message(&self, _before: &Table, after: &Table) -> Result<Message> {
        Ok(self.message(MessageBody::AlterTable {
            table: embed(after, keys::TABLE_OBJ)?,
        }))
    }

    pub fn build_drop_table_message(&self, table: &Table) -> Result<Message> {
        Ok(self.message(MessageBody::DropTable {
            db_name: table.db_name.clone(),
            table_name: table.table_name.clone(),
        }))
    }

    /// Partitions are drained and encoded before this returns.
    pub fn build_add_partition_message<'a, I>(&self, table: &Table, partitions: I) -> Result<Message>
    where
        I: IntoIterator<Item = &'a Partition>,
    {
        let table = embed(table, keys::TABLE_OBJ)?;
        let partitions = partitions
            .into_iter()
            .map(|p| embed(p, keys::PARTITION_LIST))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(partitions = partitions.len(), "encoded added partitions");
        Ok(self.message(MessageBody::AddPartition { table, partitions }))
    }

    pub fn build_alter_partition_message(
        &self,
        table: &Table,
        before: &Partition,
        after: &Partition,
    ) -> Result<Message> {
        Ok(self.message(MessageBody::AlterPartition {
            table: embed(table, keys::TABLE_OBJ)?,
            before: embed(before, keys::PARTITION_OBJ_BEFORE)?,
            after: embed(after, keys::PARTITION_OBJ_AFTER)?,
        }))
    }

    /// Each dropped partition is recorded as its key/value mapping only.
    ///
    /// # Errors
    /// `PartitionKeyMismatch` if any partition's value count differs from the
    /// table's partition-key count.
    pub fn build_drop_partition_message<'a, I>(
        &self,
        table: &Table,
        partitions: I,
    ) -> Result<Message>
    where
        I: IntoIterator<Item = &'a Partition>,
    {
        let partitions = partitions
            .into_iter()
            .map(|p| partition_key_values(table, p))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.message(MessageBody::DropPartition {
            db_name: table.db_name.clone(),
            table_name: table.table_name.clone(),
            partitions,
        }))
    }

    pub fn build_create_function_message(&self, function: &Function) -> Result<Message> {
        Ok(self.message(MessageBody::CreateFunction {
            function: embed(function, keys::FUNCTION_OBJ)?,
        }))
    }

    /// Embeds the whole function, not just its name.
    pub fn build_drop_function_message(&self, function: &Function) -> Result<Message> {
        Ok(self.message(MessageBody::DropFunction {
            function: embed(function, keys::FUNCTION_OBJ)?,
        }))
    }

    pub fn build_create_index_message(&self, index: &Index) -> Result<Message> {
        Ok(self.message(MessageBody::CreateIndex {
            index: embed(index, keys::INDEX_OBJ)?,
        }))
    }

    /// Embeds the whole index, not just its name.
    pub fn build_drop_index_message(&self, index: &Index) -> Result<Message> {
        Ok(self.message(MessageBody::DropIndex {
            index: embed(index, keys::INDEX_OBJ)?,
        }))
    }

    pub fn build_alter_index_message(&self, before: &Index, after: &Index) -> Result<Message> {
        Ok(self.message(MessageBody::AlterIndex {
            before: embed(before, keys::INDEX_OBJ_BEFORE)?,
            after: embed(after, keys::INDEX_OBJ_AFTER)?,
        }))
    }

    pub fn build_insert_message<I, S>(
        &self,
        db_name: &str,
        table_name: &str,
        partition_key_values: PartitionKeyValues,
        files: I,
    ) -> Result<Message>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.message(MessageBody::Insert {
            db_name: db_name.to_string(),
            table_name: table_name.to_string(),
            partition_key_values,
            files: files.into_iter().map(Into::into).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metastore_api::FieldSchema;

    const NOW: i64 = 1_700_000_000;

    fn factory() -> JsonMessageFactory {
        JsonMessageFactory::new(MessagingConfig::new(
            "thrift://metastore:9083",
            "hive/_HOST@EXAMPLE.COM",
        ))
        .with_clock(|| NOW)
    }

    fn partitioned_table() -> Table {
        let mut table = Table::new("sales", "orders");
        table.partition_keys = vec![
            FieldSchema::new("ds", "string"),
            FieldSchema::new("region", "string"),
        ];
        table
    }

    #[test]
    fn stamps_metadata() {
        let msg = factory()
            .build_create_database_message(&Database::new("sales"))
            .unwrap();
        assert_eq!(msg.server, "thrift://metastore:9083");
        assert_eq!(msg.principal, "hive/_HOST@EXAMPLE.COM");
        assert_eq!(msg.timestamp, NOW);
        assert_eq!(msg.db_name(), Some("sales"));
    }

    #[test]
    fn wall_clock_is_whole_seconds() {
        let f = JsonMessageFactory::new(MessagingConfig::default());
        let before = chrono::Utc::now().timestamp();
        let msg = f.build_drop_database_message(&Database::new("x")).unwrap();
        let after = chrono::Utc::now().timestamp();
        assert!(msg.timestamp >= before && msg.timestamp <= after);
    }

    #[test]
    fn format_identity() {
        let f = factory();
        assert_eq!(f.message_format(), "json");
        assert_eq!(f.version(), "0.1");
    }

    #[test]
    fn alter_table_keeps_only_after() {
        let before = Table::new("sales", "orders");
        let mut after = before.clone();
        after.owner = Some("new-owner".to_string());
        let msg = factory().build_alter_table_message(&before, &after).unwrap();
        assert_eq!(msg.table_obj().unwrap(), after);
        assert_ne!(msg.table_obj().unwrap(), before);
    }

    #[test]
    fn add_partition_consumes_single_pass_iterator() {
        let table = partitioned_table();
        let parts: Vec<Partition> = (1..=3)
            .map(|d| Partition::new("sales", "orders", [format!("2024-01-0{}", d), "us".into()]))
            .collect();
        let msg = factory()
            .build_add_partition_message(&table, parts.iter().filter(|_| true))
            .unwrap();
        assert_eq!(msg.partition_objs().unwrap(), parts);
    }

    #[test]
    fn partition_key_values_pair_positionally() {
        let table = partitioned_table();
        let p = Partition::new("sales", "orders", ["2024-01-01", "us"]);
        let kv = partition_key_values(&table, &p).unwrap();
        let pairs: Vec<_> = kv.iter().collect();
        assert_eq!(pairs, vec![("ds", "2024-01-01"), ("region", "us")]);
    }

    #[test]
    fn partition_value_count_mismatch_is_rejected() {
        let table = partitioned_table();
        let p = Partition::new("sales", "orders", ["2024-01-01"]);
        let err = factory()
            .build_drop_partition_message(&table, [&p])
            .unwrap_err();
        assert!(matches!(
            err,
            MessagingError::PartitionKeyMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn unpartitioned_table_gives_empty_mapping() {
        let table = Table::new("sales", "orders");
        let p = Partition::new("sales", "orders", Vec::<String>::new());
        assert!(partition_key_values(&table, &p).unwrap().is_empty());
    }

    #[test]
    fn drop_function_embeds_whole_object() {
        let f = Function::new("default", "to_upper", "com.example.ToUpper");
        let msg = factory().build_drop_function_message(&f).unwrap();
        assert_eq!(msg.function_obj().unwrap(), f);
    }

    #[test]
    fn insert_keeps_file_order() {
        let kv: PartitionKeyValues = [("ds", "2024-01-01")].into_iter().collect();
        let msg = factory()
            .build_insert_message("sales", "orders", kv.clone(), ["b.orc", "a.orc"])
            .unwrap();
        match msg.body {
            MessageBody::Insert {
                files,
                partition_key_values,
                ..
            } => {
                assert_eq!(files, vec!["b.orc", "a.orc"]);
                assert_eq!(partition_key_values, kv);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn factory_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonMessageFactory>();
        assert_send_sync::<Message>();
    }
}
