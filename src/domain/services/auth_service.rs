use std::sync::Arc;
use crate::domain::{
    models::{auth::{AccessToken, Claims, Credentials, Identity}, user::User},
    ports::{AuthProvider, UserRepository},
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use uuid::Uuid;
use chrono::{Utc, Duration};
use tracing::{info, warn};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
}

/// Password login against a `UserRepository`, HS256 bearer tokens.
pub struct JwtAuthProvider {
    users: Arc<dyn UserRepository>,
    issuer: String,
    token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtAuthProvider {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Self {
        let secret = config.jwt_secret_key.as_bytes();
        Self {
            users,
            issuer: config.auth_issuer.clone(),
            token_ttl: Duration::minutes(config.access_token_expire_minutes),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Creates `username` unless it already exists.
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<(), AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(());
        }
        let user = User::new(username.to_string(), hash_password(password)?);
        self.users.create(&user).await?;
        info!("Seeded user: {}", username);
        Ok(())
    }
}

fn bad_credentials() -> AppError {
    AppError::Unauthorized("Incorrect username or password".into())
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        let user = self.users.find_by_username(&credentials.username).await?
            .ok_or_else(bad_credentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(credentials.password.as_bytes(), &parsed_hash)
            .map_err(|_| {
                warn!("Failed login for user: {}", credentials.username);
                bad_credentials()
            })?;

        Ok(Identity { user_id: user.id, username: user.username })
    }

    fn issue_token(&self, identity: &Identity) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: identity.username.clone(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok(AccessToken::bearer(token))
    }

    async fn validate(&self, token: &str) -> Result<Identity, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized("Could not validate credentials".into()))?;

        let user = self.users.find_by_username(&token_data.claims.sub).await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;

        if user.disabled {
            return Err(AppError::BadRequest("Inactive user".into()));
        }

        Ok(Identity { user_id: user.id, username: user.username })
    }
}
