use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type MessageId = String;

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub sender_id: UserId,
    #[serde(default)]
    pub receiver_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn key(&self) -> MessageKey {
        match &self.id {
            Some(id) => MessageKey::Id(id.clone()),
            None => MessageKey::CreatedAt(self.created_at),
        }
    }
}

/// Identity used to key a rendered message row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Id(MessageId),
    CreatedAt(DateTime<Utc>),
}

/// Which side of the timeline a message is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Outgoing,
    Incoming,
}

impl Side {
    /// A message is outgoing exactly when the current user sent it.
    pub fn of(message: &Message, current_user_id: &str) -> Self {
        if message.sender_id == current_user_id {
            Side::Outgoing
        } else {
            Side::Incoming
        }
    }
}

/// The other participant of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of a send-message call. Exactly the keys that are set get serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn image(encoded: impl Into<String>) -> Self {
        Self {
            text: None,
            image: Some(encoded.into()),
        }
    }
}

/// Body of an update-profile call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Formats a message timestamp as a 24h `HH:MM` label in the given zone.
pub fn format_message_time_in<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created_at.with_timezone(tz).format("%H:%M").to_string()
}

pub fn format_message_time(created_at: &DateTime<Utc>) -> String {
    format_message_time_in(created_at, &chrono::Local)
}
