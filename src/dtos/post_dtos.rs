use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::auth_dtos::UserOut;

#[derive(Debug, Deserialize)]
pub struct CreatePostDTO {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostDTO {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentDTO {
    pub content: Option<String>,
}

/// Comment authors only expose their username.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentAuthorOut {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentOut {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub author: Option<CommentAuthorOut>,
    pub created_at: DateTime<Utc>,
}

/// A post with its author and comment authors resolved.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOut {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author: Option<UserOut>,
    pub comments: Vec<CommentOut>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
