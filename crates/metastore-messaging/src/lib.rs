//! Catalog change-event messaging.
//!
//! Write path: catalog object → record text → [`Message`] → JSON envelope.
//! Read path: JSON envelope → [`JsonTree`] → record text → catalog object.
//!
//! The envelope is plain JSON with fixed keys per [`EventKind`]. Catalog
//! objects inside it are opaque strings produced by the
//! [`metastore_api`] record codec.

mod config;
mod deserializer;
mod embedded;
mod error;
mod event;
mod factory;
mod json;
mod message;
mod notification;

pub use config::MessagingConfig;
pub use deserializer::{get_deserializer, JsonMessageDeserializer, MessageDeserializer};
pub use embedded::Embedded;
pub use error::{MessagingError, Result};
pub use event::EventKind;
pub use factory::{partition_key_values, Clock, JsonMessageFactory};
pub use json::{
    get_function_obj, get_index_obj, get_index_obj_with_key, get_json_tree, get_partition_obj,
    get_partition_obj_list, get_table_obj, keys, serialize_message, to_json_tree, JsonTree,
};
pub use message::{Message, MessageBody, PartitionKeyValues};
pub use notification::{get_json_tree_from_event, NotificationEvent};

/// Message format name.
pub const MESSAGE_FORMAT: &str = "json";

/// Message format version.
pub const MESSAGE_VERSION: &str = "0.1";
