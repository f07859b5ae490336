//! Request and response shapes for the greeter endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body for `POST /your-name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRequest {
    /// Name to echo back. Missing or `null` decodes as the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl NameRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// A request is only valid when it carries a non-empty name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body used for every greeter response, success or error.
///
/// There is no error code field; the HTTP status alone tells the caller
/// whether the request succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
