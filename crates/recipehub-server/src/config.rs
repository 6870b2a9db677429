//! Environment-driven server configuration.

use std::env;
use std::fs;
use std::io;

use recipehub_auth::AuthConfig;
use recipehub_db::DbConfig;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Everything the server needs, assembled from `RECIPEHUB_*` variables
/// with local-development defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `RECIPEHUB_JWT_PRIVATE_KEY` / `RECIPEHUB_JWT_PUBLIC_KEY` are
    /// paths to PEM files; they are the only required variables.
    pub fn from_env() -> io::Result<Self> {
        let private_key_path = env::var("RECIPEHUB_JWT_PRIVATE_KEY").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "RECIPEHUB_JWT_PRIVATE_KEY not set")
        })?;
        let public_key_path = env::var("RECIPEHUB_JWT_PUBLIC_KEY").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "RECIPEHUB_JWT_PUBLIC_KEY not set")
        })?;

        let auth = AuthConfig {
            jwt_private_key_pem: fs::read_to_string(&private_key_path)?,
            jwt_public_key_pem: fs::read_to_string(&public_key_path)?,
            pepper: env::var("RECIPEHUB_PASSWORD_PEPPER").ok(),
            ..AuthConfig::default()
        };

        let db = DbConfig {
            url: env_or("RECIPEHUB_DB_URL", "127.0.0.1:8000"),
            namespace: env_or("RECIPEHUB_DB_NAMESPACE", "recipehub"),
            database: env_or("RECIPEHUB_DB_NAME", "main"),
            username: env_or("RECIPEHUB_DB_USER", "root"),
            password: env_or("RECIPEHUB_DB_PASS", "root"),
        };

        Ok(Self { db, auth })
    }
}
