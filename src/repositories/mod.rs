// src/repositories/mod.rs
//! Persistence seams. Services only see the traits; `Pg*` types are the
//! production implementations.

pub mod post_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::models::post::{Comment, Post, PostChanges};
use crate::models::user::User;

pub use post_repository::PgPostRepository;
pub use user_repository::PgUserRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Db(tokio_postgres::Error),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
}

impl From<tokio_postgres::Error> for RepoError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            RepoError::Conflict(err.to_string())
        } else {
            RepoError::Db(err)
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `RepoError::Conflict` when the username or email is taken.
    async fn create(&self, user: &User) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// `email` must already be normalised (trimmed, lowercase).
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Unknown ids are skipped; order of the result is unspecified.
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<User>>;

    async fn exists_by_email_or_username(&self, email: &str, username: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>>;

    async fn list_newest_first(&self) -> RepoResult<Vec<Post>>;

    /// Returns the updated post, or `None` if it no longer exists.
    async fn update(
        &self,
        id: Uuid,
        changes: &PostChanges,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Post>>;

    /// Removes the post with its embedded comments. `false` if nothing matched.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Appends to the embedded comment list in one write. `false` if the post
    /// does not exist.
    async fn push_comment(&self, id: Uuid, comment: &Comment, at: DateTime<Utc>)
    -> RepoResult<bool>;
}
