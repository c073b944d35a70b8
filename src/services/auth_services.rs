// src/services/auth_services.rs
use std::sync::{Arc, LazyLock};

use actix_web::web;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use regex::Regex;
use uuid::Uuid;

use crate::dtos::auth_dtos::{LoginIn, RegisterIn};
use crate::error::{ApiError, ApiResult};
use crate::models::user::{JwtClaims, NewUser, User};
use crate::repositories::{RepoError, UserRepository};
use crate::services::password::{MIN_PASSWORD_CHARS, hash_password, verify_password};

pub const TOKEN_TTL_DAYS: i64 = 7;
const USERNAME_CHARS: std::ops::RangeInclusive<usize> = 3..=30;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email regex is valid")
});

fn looks_like_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: impl Into<String>) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub async fn register(&self, input: RegisterIn) -> ApiResult<Uuid> {
        let (Some(username), Some(email), Some(password)) = (
            non_blank(input.username),
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(ApiError::validation("All fields are required"));
        };

        let email = email.to_lowercase();
        if !USERNAME_CHARS.contains(&username.chars().count()) {
            return Err(ApiError::validation(
                "Username must be between 3 and 30 characters",
            ));
        }
        if !looks_like_email(&email) {
            return Err(ApiError::validation("Invalid email format"));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ApiError::validation(
                "Password must be at least 6 characters long",
            ));
        }

        if self
            .users
            .exists_by_email_or_username(&email, &username)
            .await?
        {
            return Err(ApiError::Conflict(
                "User already exists with this email or username".to_string(),
            ));
        }

        let password_hash = web::block(move || hash_password(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {}", e)))??;

        let user = NewUser {
            username,
            email,
            password_hash,
        }
        .into_user(Utc::now());

        // the unique constraints still decide if two registrations race
        self.users.create(&user).await.map_err(|e| {
            if let RepoError::Conflict(detail) = &e {
                log::warn!("registration lost a uniqueness race: {}", detail);
            }
            ApiError::from(e)
        })?;

        log::info!("registered user {} ({})", user.username, user.id);
        Ok(user.id)
    }

    /// Returns the user and a freshly signed bearer token.
    pub async fn login(&self, input: LoginIn) -> ApiResult<(User, String)> {
        let (Some(email), Some(password)) = (
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(ApiError::validation("Email and password are required"));
        };

        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(invalid_credentials)?;

        let stored_hash = user.password_hash.clone();
        let matches = web::block(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ApiError::Internal(format!("verification task failed: {}", e)))??;
        if !matches {
            log::debug!("password mismatch for user {}", user.id);
            return Err(invalid_credentials());
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub fn issue_token(&self, user: &User) -> ApiResult<String> {
        self.issue_token_at(user, Utc::now())
    }

    fn issue_token_at(&self, user: &User, now: DateTime<Utc>) -> ApiResult<String> {
        let claims = JwtClaims {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Checks signature and expiry and returns the decoded identity.
    pub fn verify_token(&self, token: &str) -> Result<(Uuid, String), jsonwebtoken::errors::Error> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        let user_id = Uuid::parse_str(&data.claims.user_id)
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;
        Ok((user_id, data.claims.email))
    }
}
