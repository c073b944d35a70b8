// src/repositories/user_repository.rs
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::user::User;
use crate::repositories::{RepoResult, UserRepository};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> RepoResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO users (id, username, email, password_hash, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &user.id,
                    &user.username,
                    &user.email,
                    &user.password_hash,
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&email]).await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let rows = client.query(sql.as_str(), &[&ids]).await?;
        Ok(rows.iter().map(row_to_user).collect())
    }

    async fn exists_by_email_or_username(&self, email: &str, username: &str) -> RepoResult<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 OR username = $2)",
                &[&email, &username],
            )
            .await?;
        Ok(row.get(0))
    }
}
