//! Server state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::SessionStore;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared handler state.
///
/// Cloned per request; every field is either cheap to copy or behind an
/// `Arc`. There is no other cross-request mutable state — handlers talk to
/// the database and the session store only.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// In-process session store
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    /// Open the database, apply migrations, and build the shared state.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            sessions: Arc::new(SessionStore::new()),
        })
    }
}
