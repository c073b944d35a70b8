// src/test_support.rs
//! Shared fixtures for handler tests: the real route table over in-memory
//! repositories and a throwaway upload directory.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, Error, http::StatusCode, test, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::repositories::memory_repository::{MemoryPostRepository, MemoryUserRepository};
use crate::services::auth_services::AuthService;
use crate::services::post_services::PostService;
use crate::services::upload_services::UploadService;
use crate::{AppState, configure};

pub const TEST_SECRET: &str = "test-secret";

pub fn test_state(upload_dir: &std::path::Path) -> AppState {
    let users = Arc::new(MemoryUserRepository::default());
    let posts = Arc::new(MemoryPostRepository::default());
    AppState {
        auth: AuthService::new(users.clone(), TEST_SECRET),
        posts: PostService::new(posts, users),
        uploads: UploadService::new(upload_dir),
    }
}

/// The temp dir must outlive the service, so it is handed back to the caller.
pub async fn test_app() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    TempDir,
) {
    let dir = tempfile::tempdir().expect("temp upload dir");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(dir.path())))
            .configure(configure),
    )
    .await;
    (app, dir)
}

/// Registers a user, logs in, and returns `(user id, token)`.
pub async fn register_and_login<S, B>(
    app: &S,
    username: &str,
    email: &str,
    password: &str,
) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": username, "email": email, "password": password}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": email, "password": password}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["email"], email);

    (
        body["user"]["_id"].as_str().expect("user id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}

pub async fn create_post<S, B>(app: &S, token: &str, title: &str, content: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"title": title, "content": content}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}
