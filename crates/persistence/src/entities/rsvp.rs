//! RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Rsvp;
use sqlx::FromRow;

/// Database row mapping for the rsvps table.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
    pub id: i64,
    pub name: String,
    pub will_attend: bool,
    pub number_of_guests: Option<i32>,
    pub dietary_restrictions: Option<String>,
    pub message: Option<String>,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RsvpEntity> for Rsvp {
    fn from(entity: RsvpEntity) -> Self {
        Rsvp {
            id: entity.id,
            name: entity.name,
            will_attend: entity.will_attend,
            number_of_guests: entity.number_of_guests,
            dietary_restrictions: entity.dietary_restrictions,
            message: entity.message,
            is_confirmed: entity.is_confirmed,
            created_at: entity.created_at,
        }
    }
}
