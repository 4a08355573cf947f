//! Notification-log record carrying a serialized message.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::json::{get_json_tree, serialize_message, JsonTree};
use crate::message::{Message, MessageBody};

/// One entry of the catalog notification log.
///
/// `db_name` / `table_name` duplicate the message's target so log readers
/// can filter without parsing `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub event_id: i64,
    /// Unix seconds.
    pub event_time: i64,
    /// Event kind wire name (e.g. `CREATE_TABLE`).
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Serialized JSON envelope.
    pub message: String,
}

impl NotificationEvent {
    /// Wrap a message. Target names come from plain fields where the message
    /// has them, otherwise from the embedded object.
    ///
    /// # Errors
    /// `InnerDecode` if the embedded object needed for the target names
    /// cannot be decoded.
    pub fn from_message(event_id: i64, message: &Message) -> Result<Self> {
        let (db_name, table_name) = match &message.body {
            MessageBody::CreateTable { .. }
            | MessageBody::AlterTable { .. }
            | MessageBody::AddPartition { .. }
            | MessageBody::AlterPartition { .. } => {
                let table = message.table_obj()?;
                (Some(table.db_name), Some(table.table_name))
            }
            MessageBody::CreateFunction { .. } | MessageBody::DropFunction { .. } => {
                (Some(message.function_obj()?.db_name), None)
            }
            MessageBody::CreateIndex { .. } | MessageBody::DropIndex { .. } => {
                let index = message.index_obj()?;
                (Some(index.db_name), Some(index.orig_table_name))
            }
            MessageBody::AlterIndex { .. } => {
                let index = message.index_obj_after()?;
                (Some(index.db_name), Some(index.orig_table_name))
            }
            _ => (
                message.db_name().map(str::to_string),
                message.table_name().map(str::to_string),
            ),
        };

        Ok(Self {
            event_id,
            event_time: message.timestamp,
            event_type: message.event_kind().as_str().to_string(),
            db_name,
            table_name,
            message: serialize_message(message),
        })
    }
}

/// Parse the envelope held by a notification event.
pub fn get_json_tree_from_event(event: &NotificationEvent) -> Result<JsonTree> {
    get_json_tree(event.message.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MessagingConfig;
    use crate::factory::JsonMessageFactory;
    use crate::json::get_index_obj_with_key;
    use crate::json::keys;
    use metastore_api::{Database, Index, Table};

    fn factory() -> JsonMessageFactory {
        JsonMessageFactory::new(MessagingConfig::new("thrift://ms:9083", "")).with_clock(|| 42)
    }

    #[test]
    fn create_table_event_names_target() {
        let msg = factory()
            .build_create_table_message(&Table::new("sales", "orders"))
            .unwrap();
        let event = NotificationEvent::from_message(7, &msg).unwrap();
        assert_eq!(event.event_id, 7);
        assert_eq!(event.event_time, 42);
        assert_eq!(event.event_type, "CREATE_TABLE");
        assert_eq!(event.db_name.as_deref(), Some("sales"));
        assert_eq!(event.table_name.as_deref(), Some("orders"));
    }

    #[test]
    fn database_event_has_no_table() {
        let msg = factory()
            .build_create_database_message(&Database::new("sales"))
            .unwrap();
        let event = NotificationEvent::from_message(1, &msg).unwrap();
        assert_eq!(event.db_name.as_deref(), Some("sales"));
        assert!(event.table_name.is_none());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("table_name").is_none());
    }

    #[test]
    fn event_message_parses_back() {
        let before = Index::new("sales", "orders", "idx");
        let mut after = before.clone();
        after.deferred_rebuild = true;
        let msg = factory().build_alter_index_message(&before, &after).unwrap();
        let event = NotificationEvent::from_message(3, &msg).unwrap();
        assert_eq!(event.table_name.as_deref(), Some("orders"));

        let tree = get_json_tree_from_event(&event).unwrap();
        assert_eq!(
            get_index_obj_with_key(&tree, keys::INDEX_OBJ_BEFORE).unwrap(),
            before
        );
        assert_eq!(
            get_index_obj_with_key(&tree, keys::INDEX_OBJ_AFTER).unwrap(),
            after
        );
    }
}
