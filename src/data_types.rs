// src/data_types.rs
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document stored in one of the backend collections.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Fresh document id, `prefix_<uuid>`.
pub fn record_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Current instant as the ISO-8601 string the backend stores.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wedding {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub partner_one: String,
    pub partner_two: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Wedding {
    const COLLECTION: &'static str = "weddings";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    pub user_id: String,
    pub wedding_id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

impl Guest {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

impl Record for Guest {
    const COLLECTION: &'static str = "guests";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestGroup {
    pub id: String,
    pub user_id: String,
    pub wedding_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provisioned with the workspace; cannot be deleted from the UI.
    #[serde(default)]
    pub builtin: bool,
    pub created_at: String,
}

impl Record for GuestGroup {
    const COLLECTION: &'static str = "guestGroups";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Broadcast,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Draft,
    Scheduled,
    Sent,
    Failed,
}

impl MessageStatus {
    pub fn label(self) -> &'static str {
        match self {
            MessageStatus::Draft => "Draft",
            MessageStatus::Scheduled => "Scheduled",
            MessageStatus::Sent => "Sent",
            MessageStatus::Failed => "Failed",
        }
    }
}

/// A drafted or scheduled broadcast. Nothing in this app dispatches SMS;
/// delivery and reply counters are filled in by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub wedding_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub content: String,
    pub message_type: MessageKind,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub recipient_count: u32,
    #[serde(default)]
    pub delivery_count: u32,
    #[serde(default)]
    pub reply_count: u32,
    pub created_at: String,
}

impl Record for Message {
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: String,
    pub name: String,
    pub content: String,
    pub category: String,
}

impl Record for MessageTemplate {
    const COLLECTION: &'static str = "messageTemplates";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-account settings: the Twilio credentials form plus notification
/// toggles. Stored only; no SMS integration reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub twilio_account_sid: String,
    #[serde(default)]
    pub twilio_auth_token: String,
    #[serde(default)]
    pub twilio_phone_number: String,
    #[serde(default)]
    pub notify_on_reply: bool,
    #[serde(default)]
    pub notify_on_rsvp: bool,
    #[serde(default)]
    pub daily_digest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for AccountSettings {
    const COLLECTION: &'static str = "settings";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_use_camel_case_wire_fields() {
        let guest = Guest {
            id: "guest_1".into(),
            user_id: "user_1".into(),
            wedding_id: "wedding_1".into(),
            first_name: "Jane".into(),
            last_name: Some("Doe".into()),
            phone_number: "+15559876543".into(),
            email: None,
            group: Some("Friends".into()),
            notes: None,
            created_at: "2025-06-01T12:00:00Z".into(),
        };
        let value = serde_json::to_value(&guest).unwrap();
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["phoneNumber"], "+15559876543");
        assert_eq!(value["weddingId"], "wedding_1");
        // Absent optionals are omitted, not serialized as null.
        assert!(value.get("email").is_none());
    }

    #[test]
    fn message_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(MessageStatus::Scheduled).unwrap(),
            serde_json::json!("scheduled")
        );
        assert_eq!(
            serde_json::to_value(MessageKind::Broadcast).unwrap(),
            serde_json::json!("broadcast")
        );
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "userId": "user_1",
            "weddingId": "wedding_1",
            "content": "Save the date!",
            "messageType": "broadcast",
            "status": "draft",
            "createdAt": "2025-06-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(message.recipient_count, 0);
        assert_eq!(message.reply_count, 0);
        assert_eq!(message.status, MessageStatus::Draft);
    }

    #[test]
    fn record_ids_carry_their_prefix_and_differ() {
        let a = record_id("guest");
        let b = record_id("guest");
        assert!(a.starts_with("guest_"));
        assert_ne!(a, b);
    }

    #[test]
    fn guest_display_name_handles_missing_last_name() {
        let mut guest: Guest = serde_json::from_value(serde_json::json!({
            "id": "guest_1",
            "userId": "user_1",
            "weddingId": "wedding_1",
            "firstName": "Jane",
            "phoneNumber": "+15559876543",
            "createdAt": "2025-06-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(guest.display_name(), "Jane");
        guest.last_name = Some("Doe".into());
        assert_eq!(guest.display_name(), "Jane Doe");
    }
}
