//! Records and request bodies. JSON field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored account. Plain-text password, returned as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i32,
    pub username: String,
    pub password: String,
}

/// A stored message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: i32,
    pub posted_by: i32,
    pub message_text: String,
    /// Unix epoch seconds.
    pub time_posted_epoch: i64,
}

/// Register body. Fields stay optional so null or missing values fail validation instead of decoding.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login body.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Create-message body. `timePostedEpoch` defaults to the current time.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub posted_by: Option<i32>,
    pub message_text: Option<String>,
    pub time_posted_epoch: Option<i64>,
}

/// PATCH body; anything besides `messageText` is ignored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageTextUpdate {
    pub message_text: Option<String>,
}

/// Validated account ready for insertion; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: String,
    pub password: String,
}

/// Validated message ready for insertion; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDraft {
    pub posted_by: i32,
    pub message_text: String,
    pub time_posted_epoch: i64,
}
