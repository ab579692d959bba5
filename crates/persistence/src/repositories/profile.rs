//! Admin account and profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AdminAccountEntity, ProfileEntity};
use crate::metrics::QueryTimer;

/// Repository for admin account and profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by email (login lookup).
    pub async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminAccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_email");
        let result = sqlx::query_as::<_, AdminAccountEntity>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admin_accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an account by id (token subject lookup).
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AdminAccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_id");
        let result = sqlx::query_as::<_, AdminAccountEntity>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admin_accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new account. Fails with a unique violation when the email
    /// is already registered.
    pub async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccountEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_account");
        let result = sqlx::query_as::<_, AdminAccountEntity>(
            r#"
            INSERT INTO admin_accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an account; the profile row cascades. Used by provisioning
    /// rollback when the profile write fails after account creation.
    pub async fn delete_account(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_account");
        let result = sqlx::query("DELETE FROM admin_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected() > 0);
        timer.record();
        result
    }

    /// Find a profile by account id.
    pub async fn find_profile(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, first_name, last_name, is_admin, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Upsert the profile for an account with the admin flag set. This is
    /// the only write path that grants dashboard access.
    pub async fn upsert_admin_profile(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_admin_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (id, first_name, last_name, is_admin)
            VALUES ($1, $2, $3, true)
            ON CONFLICT (id)
            DO UPDATE SET first_name = $2, last_name = $3, is_admin = true, updated_at = NOW()
            RETURNING id, first_name, last_name, is_admin, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
