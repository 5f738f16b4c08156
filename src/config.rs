use std::env;
use crate::error::AppError;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String,
    pub auth_issuer: String,
    pub access_token_expire_minutes: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://events.db".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| AppError::Config("PORT must be a number".into()))?,
            jwt_secret_key: env::var("JWT_SECRET_KEY")
                .map_err(|_| AppError::Config("JWT_SECRET_KEY must be set".into()))?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "event-management".to_string()),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| AppError::Config("ACCESS_TOKEN_EXPIRE_MINUTES must be a number".into()))?,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}
