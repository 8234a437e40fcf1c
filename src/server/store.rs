//! Score store backed by a pooled PostgreSQL connection
//!
//! Each insert borrows one connection from the pool; the guard returns it
//! when dropped, on success and on error alike.

use async_trait::async_trait;
use deadpool_postgres::{
    CreatePoolError, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime,
};
use postgres_native_tls::MakeTlsConnector;
use thiserror::Error;

use super::config::ServerConfig;
use crate::api::StoredRecord;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS public.player_score (
        id SERIAL PRIMARY KEY,
        player_name TEXT NOT NULL,
        score INTEGER NOT NULL
    )";

const INSERT_SCORE: &str = "
    INSERT INTO public.player_score (player_name, score)
    VALUES ($1, $2)
    RETURNING id, player_name, score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("could not create connection pool: {0}")]
    CreatePool(#[from] CreatePoolError),
    #[error("could not get a database connection: {0}")]
    Pool(#[from] PoolError),
    #[error("database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}

/// The single write operation the score API needs
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert_score(&self, player_name: &str, score: i32)
    -> Result<StoredRecord, StoreError>;
}

/// PostgreSQL score store
#[derive(Clone)]
pub struct PgScoreStore {
    pool: Pool,
}

impl PgScoreStore {
    /// Build the pool; connections are opened lazily on first use
    pub fn connect(config: &ServerConfig) -> Result<Self, StoreError> {
        let mut pg = deadpool_postgres::Config::new();
        pg.url = Some(config.database_url.clone());
        pg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        pg.pool = Some(PoolConfig::new(config.max_connections));

        // Certificate verification is relaxed for store connections
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        let pool = pg.create_pool(Some(Runtime::Tokio1), MakeTlsConnector::new(tls))?;

        log::info!(
            "Score store pool created (max {} connections)",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Create the `player_score` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(CREATE_TABLE).await?;
        log::info!("player_score table ready");
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn insert_score(
        &self,
        player_name: &str,
        score: i32,
    ) -> Result<StoredRecord, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(INSERT_SCORE).await?;
        let row = client.query_one(&stmt, &[&player_name, &score]).await?;

        Ok(StoredRecord {
            id: row.try_get("id")?,
            player_name: row.try_get("player_name")?,
            score: row.try_get("score")?,
        })
    }
}
