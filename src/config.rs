use std::env;
use std::path::PathBuf;

use actix_web::http::Uri;
use anyhow::{Context, Result, bail};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Settings read once at startup. Nothing here changes afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().context("PORT must be a port number")?,
            Err(_) => 5000,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => {
                log::warn!("JWT_SECRET not set, falling back to the development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.into()),
        )
        .context("ALLOWED_ORIGINS is invalid")?;

        Ok(Self {
            bind_host: env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            allowed_origins,
            jwt_secret,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

/// Comma-separated list of exact origins. `*` is rejected.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|origin| {
            if origin == "*" {
                bail!("wildcard origin `*` is not supported, list each origin");
            }
            let uri: Uri = origin
                .parse()
                .with_context(|| format!("`{}` is not a valid origin", origin))?;
            if uri.scheme().is_none() || uri.host().is_none() {
                bail!("`{}` must be of the form scheme://host[:port]", origin);
            }
            Ok(origin.to_string())
        })
        .collect()
}

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);
    if let Ok(port) = env::var("PG_PORT") {
        cfg.port = Some(port.trim().parse().context("PG_PORT must be a port number")?);
    }

    let max_size = match env::var("PG_POOL_SIZE") {
        Ok(raw) => raw.trim().parse().context("PG_POOL_SIZE must be a number")?,
        Err(_) => 16,
    };
    let mut pool_cfg = PoolConfig::default();
    pool_cfg.max_size = max_size;
    cfg.pool = Some(pool_cfg);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}
