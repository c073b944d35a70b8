// src/repositories/memory_repository.rs
//! In-process stand-ins for the Postgres repositories, used by the test suite.
//! They enforce the same uniqueness rules as the real schema.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::post::{Comment, Post, PostChanges};
use crate::models::user::User;
use crate::repositories::{PostRepository, RepoError, RepoResult, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[derive(Default)]
pub struct MemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict("users_email_key".into()));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Conflict("users_username_key".into()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.read().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.users.read().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn exists_by_email_or_username(&self, email: &str, username: &str) -> RepoResult<bool> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .any(|u| u.email == email || u.username == username))
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.posts.write().unwrap().push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>> {
        Ok(self.posts.read().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_newest_first(&self) -> RepoResult<Vec<Post>> {
        let mut posts = self.posts.read().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &PostChanges,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Post>> {
        let mut posts = self.posts.write().unwrap();
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            if let Some(title) = &changes.title {
                post.title = title.clone();
            }
            if let Some(content) = &changes.content {
                post.content = content.clone();
            }
            if let Some(image) = &changes.image {
                post.image = Some(image.clone());
            }
            post.updated_at = at;
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut posts = self.posts.write().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }

    async fn push_comment(
        &self,
        id: Uuid,
        comment: &Comment,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut posts = self.posts.write().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.comments.push(comment.clone());
                post.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
