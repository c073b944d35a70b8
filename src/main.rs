// src/main.rs
mod config;
mod db;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use crate::config::AppConfig;
use crate::handlers::auth_handlers::{login, register};
use crate::handlers::post_handlers::{
    add_comment, create_post, delete_post, get_post, list_posts, update_post,
};
use crate::handlers::upload_handlers::{serve_upload, upload_image};
use crate::repositories::{PgPostRepository, PgUserRepository};
use crate::services::auth_services::AuthService;
use crate::services::post_services::PostService;
use crate::services::upload_services::UploadService;

fn mask_secret(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub uploads: UploadService,
}

/// Route table shared by the server and the test suite.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(
            web::scope("/api")
                .service(register)     // POST /api/auth/register
                .service(login)        // POST /api/auth/login
                .service(upload_image) // POST /api/upload
                .service(list_posts)   // GET /api/posts
                .service(create_post)  // POST /api/posts
                .service(get_post)     // GET /api/posts/{id}
                .service(update_post)  // PUT /api/posts/{id}
                .service(delete_post)  // DELETE /api/posts/{id}
                .service(add_comment), // POST /api/posts/{id}/comments
        )
        .service(serve_upload); // GET /uploads/{filename}
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    info!("JWT secret: {}", mask_secret(&config.jwt_secret));

    let pg_pool = match config::get_pg_pool() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {:#}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db::bootstrap(&pg_pool).await {
        error!("Database unavailable: {:#}", e);
        std::process::exit(1);
    }
    info!("Database connected");

    let uploads = UploadService::new(&config.upload_dir);
    uploads.ensure_dir().await?;
    info!("Storing uploads in {}", config.upload_dir.display());

    let users = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let posts = Arc::new(PgPostRepository::new(pg_pool));

    let state = web::Data::new(AppState {
        auth: AuthService::new(users.clone(), config.jwt_secret.clone()),
        posts: PostService::new(posts, users),
        uploads,
    });

    let bind_address = config.bind_address();
    let allowed_origins = config.allowed_origins.clone();
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["authorization", "content-type", "accept"])
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
