//! Envelope text → [`Message`].

use crate::embedded::Embedded;
use crate::error::{MessagingError, Result};
use crate::event::EventKind;
use crate::json::{
    get_i64, get_json_tree, get_key_values, get_key_values_array, get_str, get_str_array, keys,
    JsonTree,
};
use crate::message::{Message, MessageBody};
use crate::{MESSAGE_FORMAT, MESSAGE_VERSION};

macro_rules! expecting {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            fn $name(&self, envelope: &str) -> Result<Message> {
                self.deserialize_expecting(envelope, EventKind::$kind)
            }
        )*
    };
}

/// Turns envelope text of one message format back into messages.
pub trait MessageDeserializer {
    fn deserialize_message(&self, envelope: &str) -> Result<Message>;

    /// Deserialize and check the event kind.
    ///
    /// # Errors
    /// `UnexpectedEventType` if the envelope holds a different kind.
    fn deserialize_expecting(&self, envelope: &str, kind: EventKind) -> Result<Message> {
        let message = self.deserialize_message(envelope)?;
        if message.event_kind() != kind {
            return Err(MessagingError::UnexpectedEventType {
                expected: kind.as_str(),
                got: message.event_kind().as_str(),
            });
        }
        Ok(message)
    }

    expecting! {
        deserialize_create_database_message => CreateDatabase,
        deserialize_drop_database_message => DropDatabase,
        deserialize_create_table_message => CreateTable,
        deserialize_alter_table_message => AlterTable,
        deserialize_drop_table_message => DropTable,
        deserialize_add_partition_message => AddPartition,
        deserialize_alter_partition_message => AlterPartition,
        deserialize_drop_partition_message => DropPartition,
        deserialize_create_function_message => CreateFunction,
        deserialize_drop_function_message => DropFunction,
        deserialize_create_index_message => CreateIndex,
        deserialize_drop_index_message => DropIndex,
        deserialize_alter_index_message => AlterIndex,
        deserialize_insert_message => Insert,
    }
}

/// Deserializer for the `json` / `0.1` format. Stateless; copy it freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonMessageDeserializer;

/// Select the deserializer for a format name and version.
///
/// # Errors
/// `UnsupportedFormat` for anything other than `json` / `0.1`.
pub fn get_deserializer(format: &str, version: &str) -> Result<JsonMessageDeserializer> {
    if format == MESSAGE_FORMAT && version == MESSAGE_VERSION {
        Ok(JsonMessageDeserializer)
    } else {
        Err(MessagingError::UnsupportedFormat {
            format: format.to_string(),
            version: version.to_string(),
        })
    }
}

fn owned(tree: &JsonTree, key: &str) -> Result<String> {
    get_str(tree, key).map(str::to_string)
}

fn embedded<T>(tree: &JsonTree, key: &str) -> Result<Embedded<T>> {
    get_str(tree, key).map(Embedded::from_text)
}

impl JsonMessageDeserializer {
    /// Build a message from an already-parsed envelope.
    ///
    /// Embedded record text is carried over without decoding; use the
    /// message accessors to decode it.
    pub fn message_from_tree(&self, tree: &JsonTree) -> Result<Message> {
        let event_type = get_str(tree, keys::EVENT_TYPE)?;
        let body = match EventKind::parse(event_type) {
            EventKind::CreateDatabase => MessageBody::CreateDatabase {
                db_name: owned(tree, keys::DB_NAME)?,
            },
            EventKind::DropDatabase => MessageBody::DropDatabase {
                db_name: owned(tree, keys::DB_NAME)?,
            },
            EventKind::CreateTable => MessageBody::CreateTable {
                table: embedded(tree, keys::TABLE_OBJ)?,
            },
            EventKind::AlterTable => MessageBody::AlterTable {
                table: embedded(tree, keys::TABLE_OBJ)?,
            },
            EventKind::DropTable => MessageBody::DropTable {
                db_name: owned(tree, keys::DB_NAME)?,
                table_name: owned(tree, keys::TABLE_NAME)?,
            },
            EventKind::AddPartition => MessageBody::AddPartition {
                table: embedded(tree, keys::TABLE_OBJ)?,
                partitions: get_str_array(tree, keys::PARTITION_LIST)?
                    .into_iter()
                    .map(Embedded::from_text)
                    .collect(),
            },
            EventKind::AlterPartition => MessageBody::AlterPartition {
                table: embedded(tree, keys::TABLE_OBJ)?,
                before: embedded(tree, keys::PARTITION_OBJ_BEFORE)?,
                after: embedded(tree, keys::PARTITION_OBJ_AFTER)?,
            },
            EventKind::DropPartition => MessageBody::DropPartition {
                db_name: owned(tree, keys::DB_NAME)?,
                table_name: owned(tree, keys::TABLE_NAME)?,
                partitions: get_key_values_array(tree, keys::PARTITION_KEY_VALUES_ARRAY)?,
            },
            EventKind::CreateFunction => MessageBody::CreateFunction {
                function: embedded(tree, keys::FUNCTION_OBJ)?,
            },
            EventKind::DropFunction => MessageBody::DropFunction {
                function: embedded(tree, keys::FUNCTION_OBJ)?,
            },
            EventKind::CreateIndex => MessageBody::CreateIndex {
                index: embedded(tree, keys::INDEX_OBJ)?,
            },
            EventKind::DropIndex => MessageBody::DropIndex {
                index: embedded(tree, keys::INDEX_OBJ)?,
            },
            EventKind::AlterIndex => MessageBody::AlterIndex {
                before: embedded(tree, keys::INDEX_OBJ_BEFORE)?,
                after: embedded(tree, keys::INDEX_OBJ_AFTER)?,
            },
            EventKind::Insert => MessageBody::Insert {
                db_name: owned(tree, keys::DB_NAME)?,
                table_name: owned(tree, keys::TABLE_NAME)?,
                partition_key_values: get_key_values(tree, keys::PARTITION_KEY_VALUES)?,
                files: get_str_array(tree, keys::FILES)?
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
            EventKind::Unknown => {
                return Err(MessagingError::UnknownEventType(event_type.to_string()))
            }
        };

        Ok(Message {
            server: owned(tree, keys::SERVER)?,
            principal: owned(tree, keys::PRINCIPAL)?,
            timestamp: get_i64(tree, keys::TIMESTAMP)?,
            body,
        })
    }
}

impl MessageDeserializer for JsonMessageDeserializer {
    fn deserialize_message(&self, envelope: &str) -> Result<Message> {
        self.message_from_tree(&get_json_tree(envelope.as_bytes())?)
    }
}
