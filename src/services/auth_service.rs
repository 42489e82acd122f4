//! Authentication service - back-office login and bearer resolution.
//!
//! Passwords are Argon2 hashes in `perfiles`; sessions are HS256 JWTs.
//! A bearer equal to the service-role key acts as an admin without a
//! profile.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{service_role_key, Config, SECONDS_PER_HOUR, SERVICE_ROLE_ACTOR, TOKEN_TYPE_BEARER};
use crate::domain::{password::DUMMY_HASH, Actor, AdminUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 43200)]
    pub expires_in: i64,
}

/// Caller resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub actor: Actor,
    pub role: UserRole,
}

impl Principal {
    pub fn service_role() -> Self {
        Self {
            actor: Actor::new(None, SERVICE_ROLE_ACTOR),
            role: UserRole::Admin,
        }
    }

    pub fn is_service_role(&self) -> bool {
        self.actor.id.is_none()
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a JWT
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active back-office principal
    async fn authenticate(&self, token: &str) -> AppResult<Principal>;
}

fn generate_token(user: &AdminUser, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Compare digests so the comparison time does not depend on the key prefix.
fn matches_service_role_key(token: &str, key: &str) -> bool {
    Sha256::digest(token.as_bytes()) == Sha256::digest(key.as_bytes())
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.profiles().find_by_email(&email).await?;

        // Unknown e-mails still pay for one verification.
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());
        let password_valid = Password::from_hash(hash).verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };
        if !user.is_active() {
            tracing::info!(user_id = %user.id, "Login refused for disabled account");
            return Err(AppError::Forbidden);
        }

        tracing::info!(user_id = %user.id, "Back-office login");
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Principal> {
        if let Some(key) = service_role_key() {
            if matches_service_role_key(token, &key) {
                return Ok(Principal::service_role());
            }
        }

        let claims = self.verify_token(token)?;
        let user = self
            .uow
            .profiles()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if !user.is_active() {
            return Err(AppError::Forbidden);
        }

        Ok(Principal {
            actor: Actor::new(Some(user.id), user.email),
            role: user.role,
        })
    }
}
