// src/db.rs
use anyhow::{Context, Result};
use deadpool_postgres::Pool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    username      VARCHAR(30) NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL,
    updated_at    TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id         UUID PRIMARY KEY,
    title      VARCHAR(200) NOT NULL,
    content    TEXT NOT NULL,
    image      TEXT,
    author_id  UUID NOT NULL REFERENCES users (id),
    comments   JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC);
"#;

/// Connects once and creates missing tables. Also serves as the startup
/// connectivity check.
pub async fn bootstrap(pool: &Pool) -> Result<()> {
    let client = pool
        .get()
        .await
        .context("could not connect to postgres")?;
    client
        .batch_execute(SCHEMA)
        .await
        .context("failed to apply schema")?;
    Ok(())
}
