use anyhow::Result;
use async_trait::async_trait;
use dashboard_core::{CredentialName, DashboardError, DashboardResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::models::{Holding, HoldingRecord};
use crate::store::HoldingStore;

#[derive(Clone)]
pub struct PortfolioDb {
    pool: SqlitePool,
}

fn storage_err(e: sqlx::Error) -> DashboardError {
    DashboardError::Storage(e.to_string())
}

impl PortfolioDb {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true);

        // In-memory databases are per-connection, so keep exactly one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let schema = include_str!("../../../schema.sql");

        // sqlx executes one statement per query
        for statement in schema.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&self.pool).await?;
            }
        }

        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl HoldingStore for PortfolioDb {
    async fn load_holdings(&self) -> DashboardResult<Vec<Holding>> {
        let records = sqlx::query_as::<_, HoldingRecord>(
            "SELECT id, symbol, name, shares, buy_price, buy_date, last_price, created_at
             FROM holdings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        records.into_iter().map(Holding::from_record).collect()
    }

    async fn save_holding(&self, holding: &Holding) -> DashboardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO holdings (symbol, name, shares, buy_price, buy_date, last_price)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&holding.symbol)
        .bind(&holding.name)
        .bind(holding.shares.to_string())
        .bind(holding.buy_price.to_string())
        .bind(&holding.buy_date)
        .bind(holding.current_price.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn delete_holdings(&self, symbol: &str) -> DashboardResult<u64> {
        let result = sqlx::query("DELETE FROM holdings WHERE symbol = ?")
            .bind(symbol)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(result.rows_affected())
    }

    async fn clear_holdings(&self) -> DashboardResult<()> {
        sqlx::query("DELETE FROM holdings")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn load_credentials(&self) -> DashboardResult<Vec<(CredentialName, String)>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT name, value FROM credentials ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(storage_err)?;

        let mut credentials = Vec::with_capacity(rows.len());
        for (name, value) in rows {
            match name.parse::<CredentialName>() {
                Ok(name) => credentials.push((name, value)),
                Err(_) => tracing::warn!("Ignoring unknown stored credential: {}", name),
            }
        }
        Ok(credentials)
    }

    async fn save_credential(&self, name: CredentialName, value: &str) -> DashboardResult<()> {
        sqlx::query(
            "INSERT INTO credentials (name, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(name.as_str())
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn clear_credentials(&self) -> DashboardResult<()> {
        sqlx::query("DELETE FROM credentials")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
