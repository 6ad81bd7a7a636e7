//! Server configuration.
//!
//! Every item can be overridden through environment variables:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | ./data | Database, uploads and logs |
//! | HTTP_PORT | 3800 | HTTP API port |
//! | ENVIRONMENT | development | Runtime environment |
//! | FRONTEND_URL | http://localhost:3000 | Links embedded in emails |
//! | SENTIMENT_URL | http://localhost:8000 | Sentiment analyzer base URL |
//! | SMTP_SERVER / EMAIL_USER / EMAIL_PASSWORD | unset | SMTP relay |
//! | EXPIRATION_INTERVAL_SECS | 300 | Expiration sweep period |

use std::path::PathBuf;

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory: database, uploaded images, log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    /// Base URL of the frontend, used for links in notification emails
    pub frontend_url: String,
    /// Base URL of the sentiment analyzer service
    pub sentiment_url: String,
    /// SMTP relay settings; the mailer is disabled when unset
    pub smtp: SmtpConfig,
    /// Period of the event expiration sweep, in seconds
    pub expiration_interval_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3800),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            sentiment_url: std::env::var("SENTIMENT_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            smtp: SmtpConfig {
                server: std::env::var("SMTP_SERVER").ok(),
                user: std::env::var("EMAIL_USER").ok(),
                password: std::env::var("EMAIL_PASSWORD").ok(),
            },
            expiration_interval_secs: std::env::var("EXPIRATION_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Override work dir and port, typically from tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads/images")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.images_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
