//! Database Module
//!
//! Embedded SurrealDB storage: RocksDB engine in production, in-memory
//! engine for tests.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "club";
const DATABASE: &str = "main";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::prepare(db).await
    }

    /// Open a fresh in-memory database. Used by tests.
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_indexes(&db).await?;

        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);
        Ok(Self { db })
    }
}

/// Uniqueness the application relies on: one account per matricule and per
/// login. Everything else is enforced at the repository layer.
async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS user_matricule_idx ON TABLE user FIELDS matricule UNIQUE")
        .query("DEFINE INDEX IF NOT EXISTS user_login_idx ON TABLE user FIELDS login UNIQUE")
        .await
        .map_err(|e| AppError::database(format!("Failed to define indexes: {}", e)))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define indexes: {}", e)))?;
    Ok(())
}
