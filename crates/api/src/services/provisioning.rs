//! Admin account provisioning.
//!
//! Creating an administrator is a two-step write: the account row first,
//! then the profile row with `is_admin = true`. If the profile write fails
//! the account is deleted again, so a half-provisioned identity never
//! lingers with working credentials and no admin flag.

use sqlx::PgPool;
use thiserror::Error;

use domain::models::{AdminAccount, CreateAdminRequest, Profile};
use persistence::repositories::ProfileRepository;
use shared::password::{hash_password, PasswordError};

/// Errors that can occur during provisioning.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// A freshly provisioned administrator.
#[derive(Debug, Clone)]
pub struct ProvisionedAdmin {
    pub account: AdminAccount,
    pub profile: Profile,
}

/// Provisions admin accounts.
pub struct AdminProvisioner {
    profiles: ProfileRepository,
}

impl AdminProvisioner {
    pub fn new(pool: PgPool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool),
        }
    }

    /// Creates an account plus an admin profile, rolling the account back
    /// if the profile write fails.
    pub async fn provision(
        &self,
        request: &CreateAdminRequest,
    ) -> Result<ProvisionedAdmin, ProvisioningError> {
        let password_hash = hash_password(&request.password)?;

        let account = self
            .profiles
            .create_account(request.email.trim(), &password_hash)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    ProvisioningError::EmailAlreadyExists
                }
                _ => ProvisioningError::DatabaseError(e),
            })?;

        let profile = self
            .profiles
            .upsert_admin_profile(
                account.id,
                request.first_name.as_deref(),
                request.last_name.as_deref(),
            )
            .await;

        match profile {
            Ok(profile) => Ok(ProvisionedAdmin {
                account: account.into(),
                profile: profile.into(),
            }),
            Err(e) => {
                tracing::warn!(
                    account_id = %account.id,
                    error = %e,
                    "profile creation failed, rolling back account"
                );
                if let Err(cleanup_err) = self.profiles.delete_account(account.id).await {
                    tracing::error!(
                        account_id = %account.id,
                        error = %cleanup_err,
                        "failed to roll back orphaned account"
                    );
                }
                Err(ProvisioningError::DatabaseError(e))
            }
        }
    }
}
