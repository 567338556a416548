//! PostgreSQL storage record repository

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::domain::{DomainError, MountId, MountRepository, PageRequest, Storage, StoragePage};

const COLUMNS: &str =
    "id, mount_path, order_index, driver, cache_expiration, status, addition, remark, modified, enabled";

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/mount_registry".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Storage records kept in a single `storages` table
pub struct PostgresMountRepository {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresMountRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresMountRepository")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresMountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: "storages".to_string(),
        }
    }

    /// Connect with pooling and make sure the table exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let repository = Self::new(pool);
        repository.ensure_table().await?;
        Ok(repository)
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                mount_path TEXT NOT NULL UNIQUE,
                order_index INTEGER NOT NULL DEFAULT 0,
                driver TEXT NOT NULL,
                cache_expiration BIGINT NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT '',
                addition JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                remark TEXT NOT NULL DEFAULT '',
                modified TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                enabled BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn from_row(row: &PgRow) -> Result<Storage, DomainError> {
        let id: i32 = row.get("id");
        let cache_expiration: i64 = row.get("cache_expiration");
        let modified: DateTime<Utc> = row.get("modified");

        Ok(Storage {
            id: MountId::try_from(id)
                .map_err(|_| DomainError::storage(format!("Invalid storage id {}", id)))?,
            mount_path: row.get("mount_path"),
            order: row.get("order_index"),
            driver: row.get("driver"),
            cache_expiration: u32::try_from(cache_expiration).unwrap_or(u32::MAX),
            status: row.get("status"),
            addition: row.get("addition"),
            remark: row.get("remark"),
            modified,
            enabled: row.get("enabled"),
        })
    }

    fn from_rows(rows: Vec<PgRow>) -> Result<Vec<Storage>, DomainError> {
        rows.iter().map(Self::from_row).collect()
    }
}

/// Column value for `id`; ids past `i32::MAX` cannot exist in the table
fn db_id(id: MountId) -> Option<i32> {
    i32::try_from(id).ok()
}

fn map_write_error(e: sqlx::Error, mount_path: &str) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(format!("Mount path '{}' is already used", mount_path))
        }
        _ => DomainError::storage(format!("Failed to write storage: {}", e)),
    }
}

#[async_trait]
impl MountRepository for PostgresMountRepository {
    async fn create(&self, storage: Storage) -> Result<MountId, DomainError> {
        let query = format!(
            "INSERT INTO {} (mount_path, order_index, driver, cache_expiration, status, addition, remark, modified, enabled) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
            self.table_name
        );

        let id: i32 = sqlx::query_scalar(&query)
            .bind(&storage.mount_path)
            .bind(storage.order)
            .bind(&storage.driver)
            .bind(i64::from(storage.cache_expiration))
            .bind(&storage.status)
            .bind(&storage.addition)
            .bind(&storage.remark)
            .bind(storage.modified)
            .bind(storage.enabled)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &storage.mount_path))?;

        MountId::try_from(id).map_err(|_| DomainError::storage(format!("Invalid storage id {}", id)))
    }

    async fn update(&self, storage: Storage) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET mount_path = $2, order_index = $3, driver = $4, cache_expiration = $5, \
             status = $6, addition = $7, remark = $8, modified = $9, enabled = $10 WHERE id = $1",
            self.table_name
        );

        let Some(id) = db_id(storage.id) else {
            return Err(DomainError::not_found(format!(
                "Storage {} not found",
                storage.id
            )));
        };

        let result = sqlx::query(&query)
            .bind(id)
            .bind(&storage.mount_path)
            .bind(storage.order)
            .bind(&storage.driver)
            .bind(i64::from(storage.cache_expiration))
            .bind(&storage.status)
            .bind(&storage.addition)
            .bind(&storage.remark)
            .bind(storage.modified)
            .bind(storage.enabled)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &storage.mount_path))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Storage {} not found",
                storage.id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: MountId) -> Result<(), DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);
        let Some(db_id) = db_id(id) else {
            return Err(DomainError::not_found(format!("Storage {} not found", id)));
        };

        let result = sqlx::query(&query)
            .bind(db_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete storage: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Storage {} not found", id)));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: MountId) -> Result<Option<Storage>, DomainError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, self.table_name);
        let Some(id) = db_id(id) else {
            return Ok(None);
        };

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get storage: {}", e)))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_mount_path(&self, mount_path: &str) -> Result<Option<Storage>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE mount_path = $1",
            COLUMNS, self.table_name
        );

        let row = sqlx::query(&query)
            .bind(mount_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get storage: {}", e)))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_page(&self, page: PageRequest) -> Result<StoragePage, DomainError> {
        let count_query = format!("SELECT COUNT(*) FROM {}", self.table_name);
        let total: i64 = sqlx::query_scalar(&count_query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count storages: {}", e)))?;

        // LIMIT NULL means no limit in PostgreSQL
        let query = format!(
            "SELECT {} FROM {} ORDER BY order_index, id LIMIT $1 OFFSET $2",
            COLUMNS, self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(page.limit().map(|l| l as i64))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list storages: {}", e)))?;

        Ok(StoragePage {
            items: Self::from_rows(rows)?,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn list_enabled(&self) -> Result<Vec<Storage>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE enabled ORDER BY order_index, id",
            COLUMNS, self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list storages: {}", e)))?;

        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_repository() -> PostgresMountRepository {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/mount_registry")
            .unwrap();
        PostgresMountRepository::new(pool)
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/mounts").with_max_connections(4);

        assert_eq!(config.url, "postgres://db/mounts");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_db_id_range() {
        assert_eq!(db_id(7), Some(7));
        assert_eq!(db_id(i32::MAX as MountId), Some(i32::MAX));
        assert_eq!(db_id(i32::MAX as MountId + 1), None);
    }

    #[tokio::test]
    async fn test_ids_past_column_range_never_reach_the_database() {
        let repository = lazy_repository();
        let id = u32::MAX;

        assert!(repository.find_by_id(id).await.unwrap().is_none());
        assert!(matches!(
            repository.delete(id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            repository.update(Storage::new("/drive", "local").with_id(id)).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
