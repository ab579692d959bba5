//! Message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Message;
use sqlx::FromRow;

/// Database row mapping for the messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: i64,
    pub author_name: String,
    pub message: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for Message {
    fn from(entity: MessageEntity) -> Self {
        Message {
            id: entity.id,
            author_name: entity.author_name,
            message: entity.message,
            approved: entity.approved,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_converts_to_model() {
        let entity = MessageEntity {
            id: 7,
            author_name: "Ana".to_string(),
            message: "Parabéns!".to_string(),
            approved: false,
            created_at: Utc::now(),
        };
        let model: Message = entity.into();
        assert_eq!(model.id, 7);
        assert!(!model.approved);
    }
}
