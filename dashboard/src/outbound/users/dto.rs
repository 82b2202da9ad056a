//! DTO for decoding the users document.
//!
//! The static resource serves either a bare JSON array of raw records or an
//! `{"users": [...]}` envelope; anything else reads as an empty list, the
//! same lenient handling the records themselves get.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UsersDocumentDto {
    List(Vec<Value>),
    Envelope {
        users: Vec<Value>,
    },
    // Any other well-formed JSON document carries no users.
    Other(Value),
}

impl UsersDocumentDto {
    pub(super) fn into_raw_users(self) -> Vec<Value> {
        match self {
            Self::List(users) | Self::Envelope { users } => users,
            Self::Other(_) => Vec::new(),
        }
    }
}
