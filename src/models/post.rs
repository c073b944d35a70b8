use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;

/// A post document. Comments live inside it, in insertion order.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Embedded comment, persisted as one element of the post's JSONB array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author_id: Uuid,
}

impl NewPost {
    pub fn into_post(self, now: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            content: self.content,
            image: self.image,
            author_id: self.author_id,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields to overwrite on update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl Post {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Every user id referenced by the post or its comments, without repeats.
    pub fn referenced_user_ids(&self) -> Vec<Uuid> {
        let mut ids = vec![self.author_id];
        for comment in &self.comments {
            if !ids.contains(&comment.author_id) {
                ids.push(comment.author_id);
            }
        }
        ids
    }
}
