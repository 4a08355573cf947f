use serde::{Deserialize, Serialize};

use crate::error::{MessagingError, Result};

/// Identity stamped on every message a factory builds.
///
/// Both values are copied verbatim into the `server` and `principal`
/// envelope keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Catalog server URL (e.g. `thrift://metastore:9083`).
    pub server_url: String,
    /// Kerberos service principal of the catalog server, empty if unsecured.
    pub service_principal: String,
}

impl MessagingConfig {
    pub fn new(server_url: impl Into<String>, service_principal: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            service_principal: service_principal.into(),
        }
    }

    /// Read configuration from a JSON object. Absent fields default to empty.
    ///
    /// # Errors
    /// `NotAnObject` if `json` is not an object, `InvalidJson` if a present
    /// field is not a string.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        if !json.is_object() {
            return Err(MessagingError::NotAnObject);
        }
        Ok(Self::deserialize(json)?)
    }
}
