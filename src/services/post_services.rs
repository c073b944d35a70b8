// src/services/post_services.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dtos::auth_dtos::UserOut;
use crate::dtos::post_dtos::{
    CommentAuthorOut, CommentOut, CreateCommentDTO, CreatePostDTO, PostOut, UpdatePostDTO,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::post::{Comment, MAX_TITLE_CHARS, NewPost, Post, PostChanges};
use crate::models::user::User;
use crate::repositories::{PostRepository, UserRepository};
use crate::services::auth_services::non_blank;

fn check_title(title: &str) -> ApiResult<()> {
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(
            "Title must be at most 200 characters",
        ));
    }
    Ok(())
}

/// A present field must not be blank; an absent one is left alone.
fn present_non_blank(value: Option<String>, field: &str) -> ApiResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => non_blank(Some(v))
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("{} cannot be empty", field))),
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn list(&self) -> ApiResult<Vec<PostOut>> {
        let posts = self.posts.list_newest_first().await?;

        let mut ids: Vec<Uuid> = Vec::new();
        for post in &posts {
            for id in post.referenced_user_ids() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        let directory = self.directory(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| populate(post, &directory))
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<PostOut> {
        let post = self.find(id).await?;
        self.populated(post).await
    }

    pub async fn create(&self, user: &AuthenticatedUser, input: CreatePostDTO) -> ApiResult<PostOut> {
        let (Some(title), Some(content)) = (non_blank(input.title), non_blank(input.content)) else {
            return Err(ApiError::validation("Title and content are required"));
        };
        check_title(&title)?;

        if self.users.find_by_id(user.user_id).await?.is_none() {
            log::warn!("token for unknown user {} used to create a post", user.user_id);
            return Err(ApiError::Unauthorized("User no longer exists".to_string()));
        }

        let post = NewPost {
            title,
            content,
            image: non_blank(input.image),
            author_id: user.user_id,
        }
        .into_post(Utc::now());
        self.posts.create(&post).await?;

        log::info!("user {} created post {}", user.user_id, post.id);
        self.populated(post).await
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        input: UpdatePostDTO,
    ) -> ApiResult<PostOut> {
        let post = self.find(id).await?;
        if !post.is_owned_by(user.user_id) {
            return Err(ApiError::Forbidden("Unauthorized".to_string()));
        }

        let changes = PostChanges {
            title: present_non_blank(input.title, "Title")?,
            content: present_non_blank(input.content, "Content")?,
            // an empty image keeps the current one
            image: non_blank(input.image),
        };
        if let Some(title) = &changes.title {
            check_title(title)?;
        }

        let updated = self
            .posts
            .update(id, &changes, Utc::now())
            .await?
            .ok_or_else(ApiError::post_not_found)?;
        self.populated(updated).await
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> ApiResult<()> {
        let post = self.find(id).await?;
        if !post.is_owned_by(user.user_id) {
            return Err(ApiError::Forbidden("Unauthorized".to_string()));
        }

        if !self.posts.delete(id).await? {
            return Err(ApiError::post_not_found());
        }
        log::info!("user {} deleted post {}", user.user_id, id);
        Ok(())
    }

    pub async fn add_comment(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        input: CreateCommentDTO,
    ) -> ApiResult<PostOut> {
        let content = non_blank(input.content)
            .ok_or_else(|| ApiError::validation("Comment content is required"))?;

        if self.users.find_by_id(user.user_id).await?.is_none() {
            return Err(ApiError::Unauthorized("User no longer exists".to_string()));
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content,
            author_id: user.user_id,
            created_at: now,
        };
        if !self.posts.push_comment(id, &comment, now).await? {
            return Err(ApiError::post_not_found());
        }

        log::debug!("user {} commented on post {}", user.user_id, id);
        self.get(id).await
    }

    async fn find(&self, id: Uuid) -> ApiResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::post_not_found)
    }

    async fn populated(&self, post: Post) -> ApiResult<PostOut> {
        let directory = self.directory(&post.referenced_user_ids()).await?;
        Ok(populate(post, &directory))
    }

    async fn directory(&self, ids: &[Uuid]) -> ApiResult<HashMap<Uuid, User>> {
        Ok(self
            .users
            .find_many(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

/// Resolves author references against `directory`. Unknown users become `null`.
fn populate(post: Post, directory: &HashMap<Uuid, User>) -> PostOut {
    let comments = post
        .comments
        .into_iter()
        .map(|c| CommentOut {
            id: c.id,
            content: c.content,
            author: directory.get(&c.author_id).map(|u| CommentAuthorOut {
                id: u.id,
                username: u.username.clone(),
            }),
            created_at: c.created_at,
        })
        .collect();

    PostOut {
        id: post.id,
        title: post.title,
        content: post.content,
        image: post.image,
        author: directory.get(&post.author_id).map(UserOut::from),
        comments,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
