// src/handlers/post_handlers.rs
use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::post_dtos::{CreateCommentDTO, CreatePostDTO, UpdatePostDTO};
use crate::error::{ApiError, ApiResult, MessageOut};
use crate::middleware::auth_extractor::AuthenticatedUser;

/// Ids that cannot name a post are reported the same way as missing posts.
fn parse_post_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::post_not_found())
}

#[get("/posts")]
pub async fn list_posts(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let posts = state.posts.list().await?;
    log::debug!("listing {} posts", posts.len());
    Ok(HttpResponse::Ok().json(posts))
}

#[post("/posts")]
pub async fn create_post(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<CreatePostDTO>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.create(&user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.get(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[put("/posts/{id}")]
pub async fn update_post(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostDTO>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.update(&user, id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete(&user, id).await?;
    Ok(HttpResponse::Ok().json(MessageOut::new("Post deleted successfully")))
}

#[post("/posts/{id}/comments")]
pub async fn add_comment(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateCommentDTO>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.add_comment(&user, id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde_json::{Value, json};

    use crate::models::user::JwtClaims;
    use crate::services::auth_services::TOKEN_TTL_DAYS;
    use crate::test_support::{TEST_SECRET, create_post, register_and_login, test_app};

    #[actix_web::test]
    async fn create_and_delete_walkthrough() {
        let (app, _dir) = test_app().await;
        let (_, alice) = register_and_login(&app, "alice", "alice@x.com", "secret1").await;
        let (_, bob) = register_and_login(&app, "bob", "bob@x.com", "secret2").await;

        let post = create_post(&app, &alice, "Hello", "First post").await;
        assert_eq!(post["author"]["username"], "alice");
        assert_eq!(post["author"]["email"], "alice@x.com");
        let id = post["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Unauthorized");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Post deleted successfully");

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_requires_a_token() {
        let (app, _dir) = test_app().await;
        let payload = json!({"title": "t", "content": "c"});

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access token required");

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn expired_token_is_invalid() {
        let (app, _dir) = test_app().await;
        let (user_id, _) = register_and_login(&app, "alice", "alice@x.com", "secret1").await;

        let issued = Utc::now() - Duration::days(8);
        let claims = JwtClaims {
            user_id,
            email: "alice@x.com".into(),
            iat: issued.timestamp(),
            exp: (issued + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        let stale = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {}", stale)))
            .set_json(json!({"title": "t", "content": "c"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn create_without_content_is_rejected() {
        let (app, _dir) = test_app().await;
        let (_, token) = register_and_login(&app, "alice", "alice@x.com", "secret1").await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"title": "only a title"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Title and content are required");
    }

    #[actix_web::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let (app, _dir) = test_app().await;
        for uri in [
            format!("/api/posts/{}", uuid::Uuid::new_v4()),
            "/api/posts/64b7f0c2a1e4".to_string(),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Post not found");
        }
    }

    #[actix_web::test]
    async fn owner_updates_and_others_are_forbidden() {
        let (app, _dir) = test_app().await;
        let (_, alice) = register_and_login(&app, "alice", "alice@x.com", "secret1").await;
        let (_, bob) = register_and_login(&app, "bob", "bob@x.com", "secret2").await;
        let post = create_post(&app, &alice, "Draft", "text").await;
        let uri = format!("/api/posts/{}", post["_id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .set_json(json!({"title": "mine now", "content": "text"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .set_json(json!({"title": "Final", "content": "text", "image": "/uploads/x.png"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Final");
        assert_eq!(body["image"], "/uploads/x.png");
        assert_eq!(body["author"]["username"], "alice");
    }

    #[actix_web::test]
    async fn comments_show_up_on_the_post() {
        let (app, _dir) = test_app().await;
        let (_, alice) = register_and_login(&app, "alice", "alice@x.com", "secret1").await;
        let (_, bob) = register_and_login(&app, "bob", "bob@x.com", "secret2").await;
        let post = create_post(&app, &alice, "Topic", "discuss").await;
        let uri = format!("/api/posts/{}/comments", post["_id"].as_str().unwrap());

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .set_json(json!({"content": "nice one"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["comments"][0]["content"], "nice one");
        assert_eq!(body["comments"][0]["author"]["username"], "bob");
        assert!(body["comments"][0]["author"].get("email").is_none());
        assert!(body["comments"][0]["createdAt"].is_string());

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .set_json(json!({"content": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        let listed: Value = test::read_body_json(resp).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["comments"].as_array().unwrap().len(), 1);
    }
}
