use actix_web::{HttpResponse, post, web};

use crate::AppState;
use crate::dtos::auth_dtos::{LoginIn, LoginOut, RegisterIn, RegisterOut, UserOut};
use crate::error::ApiResult;

/// POST /api/auth/register
#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterIn>,
) -> ApiResult<HttpResponse> {
    let user_id = state.auth.register(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterOut {
        message: "User created successfully".to_string(),
        user_id,
    }))
}

/// POST /api/auth/login
#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginIn>,
) -> ApiResult<HttpResponse> {
    let (user, token) = state.auth.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LoginOut {
        message: "Login successful".to_string(),
        user: UserOut::from(&user),
        token,
    }))
}
