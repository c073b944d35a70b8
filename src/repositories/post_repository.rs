// src/repositories/post_repository.rs
//! Posts are stored one document per row: scalar fields as columns and the
//! embedded comment list as a JSONB array.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::Json;
use uuid::Uuid;

use crate::models::post::{Comment, Post, PostChanges};
use crate::repositories::{PostRepository, RepoResult};

const POST_COLUMNS: &str =
    "id, title, content, image, author_id, comments, created_at, updated_at";

#[derive(Clone)]
pub struct PgPostRepository {
    pool: Pool,
}

impl PgPostRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: &Row) -> Post {
    let Json(comments): Json<Vec<Comment>> = row.get("comments");
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        author_id: row.get("author_id"),
        comments,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> RepoResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO posts (id, title, content, image, author_id, comments, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &post.id,
                    &post.title,
                    &post.content,
                    &post.image,
                    &post.author_id,
                    &Json(&post.comments),
                    &post.created_at,
                    &post.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn list_newest_first(&self) -> RepoResult<Vec<Post>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM posts ORDER BY created_at DESC", POST_COLUMNS);
        let rows = client.query(sql.as_str(), &[]).await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &PostChanges,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Post>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                image = COALESCE($4, image), \
                updated_at = $5 \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        let row = client
            .query_opt(
                sql.as_str(),
                &[&id, &changes.title, &changes.content, &changes.image, &at],
            )
            .await?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let client = self.pool.get().await?;
        let affected = client
            .execute("DELETE FROM posts WHERE id = $1", &[&id])
            .await?;
        Ok(affected > 0)
    }

    async fn push_comment(
        &self,
        id: Uuid,
        comment: &Comment,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let client = self.pool.get().await?;
        let affected = client
            .execute(
                "UPDATE posts SET comments = comments || $2::jsonb, updated_at = $3 WHERE id = $1",
                &[&id, &Json(std::slice::from_ref(comment)), &at],
            )
            .await?;
        Ok(affected > 0)
    }
}
