//! Server state - shared handles for every service.

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::realtime::DashboardGateway;
use crate::services::{ExpirationService, ImageStore, MailerService, SentimentClient};

/// Shared application state. Cloning is shallow: every service hangs off an
/// `Arc` or an internally shared handle.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT service
    pub jwt_service: Arc<JwtService>,
    /// Outbound email
    pub mailer: MailerService,
    /// Sentiment analyzer client
    pub sentiment: SentimentClient,
    /// Event image storage
    pub images: ImageStore,
    /// Socket.IO dashboard gateway
    pub dashboard: DashboardGateway,
    /// Event expiration sweep
    pub expiration: ExpirationService,
}

impl ServerState {
    /// Initialize the full service graph.
    ///
    /// # Panics
    ///
    /// Panics when the work directory cannot be created or the database
    /// fails to open - the server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("club.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let mailer = MailerService::new(&config.smtp);
        let sentiment = SentimentClient::new(config.sentiment_url.clone());
        let images = ImageStore::new(config.images_dir());
        let dashboard = DashboardGateway::new();
        let expiration =
            ExpirationService::new(db.clone(), mailer.clone(), config.frontend_url.clone());

        Self {
            config: config.clone(),
            db,
            jwt_service,
            mailer,
            sentiment,
            images,
            dashboard,
            expiration,
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
