//! Authentication service for admin login and token refresh.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use persistence::repositories::ProfileRepository;
use shared::jwt::{account_id_from_claims, JwtError, JwtKeys};
use shared::password::{verify_password, PasswordError};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub account_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    profiles: ProfileRepository,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and key material.
    pub fn new(pool: PgPool, jwt: Arc<JwtKeys>) -> Self {
        Self {
            profiles: ProfileRepository::new(pool),
            jwt,
        }
    }

    /// Authenticates an admin account by email and password.
    ///
    /// An unknown email and a wrong password return the same error, so the
    /// response never reveals whether an address is registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let account = self
            .profiles
            .find_account_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &account.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(account.id, account.email)
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResult, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let account_id =
            account_id_from_claims(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        // The account may have been deleted since the token was minted.
        let account = self
            .profiles
            .find_account_by_id(account_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.issue_tokens(account.id, account.email)
    }

    fn issue_tokens(&self, account_id: Uuid, email: String) -> Result<AuthResult, AuthError> {
        let access_token = self.jwt.generate_access_token(account_id)?;
        let refresh_token = self.jwt.generate_refresh_token(account_id)?;

        Ok(AuthResult {
            account_id,
            email,
            access_token,
            refresh_token,
            access_token_expires_in: self.jwt.access_expiry_secs,
        })
    }
}
