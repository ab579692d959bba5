//! Guest message models and the change-event payload for the live wall.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_trimmed_not_empty;

/// One guest-submitted note on the message wall.
///
/// Visible on the public feed iff `approved` is true. Created by anonymous
/// visitors, mutated only by administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub author_name: String,
    pub message: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting a new wall message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitMessageRequest {
    #[validate(custom(function = "validate_trimmed_not_empty"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub author_name: String,

    #[validate(custom(function = "validate_trimmed_not_empty"))]
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: String,
}

impl SubmitMessageRequest {
    /// Returns the trimmed author name and body, the values that get stored.
    pub fn normalized(&self) -> (String, String) {
        (
            self.author_name.trim().to_string(),
            self.message.trim().to_string(),
        )
    }
}

/// Kind of row change delivered on the message change channel.
///
/// Unknown tags deserialize to [`ChangeAction::Unknown`] and are ignored by
/// the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

/// Raw trigger notification: action and row id only.
///
/// NOTIFY payloads are capped at 8000 bytes, so the trigger never ships row
/// contents; consumers refetch the row by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MessageChangeNotice {
    pub action: ChangeAction,
    pub id: i64,
}

/// An enriched change event for the `messages` table.
///
/// Built by the change listener from a [`MessageChangeNotice`]: for inserts
/// and updates the current row is refetched and carried here; `message` is
/// `None` for deletes and for rows gone by refetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageChange {
    pub action: ChangeAction,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl MessageChange {
    pub fn insert(message: Message) -> Self {
        Self {
            action: ChangeAction::Insert,
            id: message.id,
            message: Some(message),
        }
    }

    pub fn update(message: Message) -> Self {
        Self {
            action: ChangeAction::Update,
            id: message.id,
            message: Some(message),
        }
    }

    pub fn delete(id: i64) -> Self {
        Self {
            action: ChangeAction::Delete,
            id,
            message: None,
        }
    }

    /// An insert or update whose row vanished before it could be refetched.
    pub fn vanished(action: ChangeAction, id: i64) -> Self {
        Self {
            action,
            id,
            message: None,
        }
    }
}

/// Item carried on the in-process message change bus.
#[derive(Debug, Clone)]
pub enum MessageEvent {
    Change(MessageChange),
    /// The change listener re-established its connection; events may have
    /// been missed, so consumers must resynchronize from the database.
    Resync,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64) -> Message {
        Message {
            id,
            author_name: "Ana".to_string(),
            message: "Parabéns!".to_string(),
            approved: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_submit_request_valid() {
        let request = SubmitMessageRequest {
            author_name: "Ana".to_string(),
            message: "Muito amor para vocês".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_blank_author_rejected() {
        let request = SubmitMessageRequest {
            author_name: "   ".to_string(),
            message: "hello".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_request_blank_body_rejected() {
        let request = SubmitMessageRequest {
            author_name: "Ana".to_string(),
            message: "\n\t".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_request_oversized_body_rejected() {
        let request = SubmitMessageRequest {
            author_name: "Ana".to_string(),
            message: "x".repeat(2001),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_normalized_trims_both_fields() {
        let request = SubmitMessageRequest {
            author_name: "  Ana  ".to_string(),
            message: " oi \n".to_string(),
        };
        let (name, body) = request.normalized();
        assert_eq!(name, "Ana");
        assert_eq!(body, "oi");
    }

    #[test]
    fn test_change_action_deserializes_known_tags() {
        let action: ChangeAction = serde_json::from_str("\"INSERT\"").unwrap();
        assert_eq!(action, ChangeAction::Insert);
        let action: ChangeAction = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(action, ChangeAction::Delete);
    }

    #[test]
    fn test_change_action_unknown_tag_is_tolerated() {
        let action: ChangeAction = serde_json::from_str("\"TRUNCATE\"").unwrap();
        assert_eq!(action, ChangeAction::Unknown);
    }

    #[test]
    fn test_notice_decodes_action_and_id() {
        let notice: MessageChangeNotice =
            serde_json::from_str(r#"{"action": "UPDATE", "id": 7}"#).unwrap();
        assert_eq!(notice.action, ChangeAction::Update);
        assert_eq!(notice.id, 7);
    }

    #[test]
    fn test_change_payload_round_trip() {
        let change = MessageChange::update(message(7));
        let json = serde_json::to_string(&change).unwrap();
        let parsed: MessageChange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.action, ChangeAction::Update);
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.message.unwrap().id, 7);
    }

    #[test]
    fn test_delete_payload_carries_only_the_id() {
        let change = MessageChange::delete(3);
        assert_eq!(change.id, 3);
        assert!(change.message.is_none());
        let json = serde_json::to_string(&change).unwrap();
        assert!(!json.contains("message\":"));
    }
}
