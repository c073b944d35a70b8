// src/middleware/auth_extractor.rs
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// Identity decoded from a valid `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when no token is presented and with 403 when a token is
/// presented but does not verify (bad signature, expired, malformed).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<AuthenticatedUser, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

    let token = bearer_token(req)
        .ok_or_else(|| ApiError::Unauthorized("Access token required".to_string()))?;

    match state.auth.verify_token(token) {
        Ok((user_id, email)) => Ok(AuthenticatedUser { user_id, email }),
        Err(e) => {
            log::debug!("rejected bearer token: {}", e);
            Err(ApiError::Forbidden("Invalid token".to_string()))
        }
    }
}
