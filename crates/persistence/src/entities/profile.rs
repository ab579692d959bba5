//! Admin account and profile entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{AdminAccount, Profile};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the admin_accounts table.
///
/// Carries the password hash; never convert this straight into a response
/// body, go through [`AdminAccount`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct AdminAccountEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminAccountEntity> for AdminAccount {
    fn from(entity: AdminAccountEntity) -> Self {
        AdminAccount {
            id: entity.id,
            email: entity.email,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Profile {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            is_admin: entity.is_admin,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_model_drops_password_hash() {
        let entity = AdminAccountEntity {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let model: AdminAccount = entity.clone().into();
        assert_eq!(model.email, entity.email);
        // AdminAccount has no hash field; serialization cannot leak it.
        let json = serde_json::to_string(&model).unwrap();
        assert!(!json.contains("argon2"));
    }
}
