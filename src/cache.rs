use rusqlite::{params, Connection, OptionalExtension, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::catalog::{CatalogConfiguration, TmdbClient};
use crate::error::MatchError;

const CONFIGURATION_KEY: &str = "configuration";

/// Local store for the catalog configuration object, keyed by fetch time.
pub struct ConfigCache {
    conn: Connection,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl ConfigCache {
    /// Open (or create) the cache database at `cache_path`.
    pub fn new(cache_path: &Path) -> Result<Self> {
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).ok();
        }
        Self::init(Connection::open(cache_path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS catalog_config (
                key TEXT PRIMARY KEY,
                fetched_at INTEGER NOT NULL,
                json_data TEXT NOT NULL
            )",
            [],
        )?;
        Ok(ConfigCache { conn })
    }

    pub fn store(&self, config: &CatalogConfiguration) -> Result<()> {
        self.store_at(config, now_secs())
    }

    fn store_at(&self, config: &CatalogConfiguration, fetched_at: i64) -> Result<()> {
        let json_data = serde_json::to_string(config)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO catalog_config (key, fetched_at, json_data)
             VALUES (?1, ?2, ?3)",
            params![CONFIGURATION_KEY, fetched_at, json_data],
        )?;
        Ok(())
    }

    /// The stored configuration if it was fetched less than `max_age` ago.
    /// Rows that no longer deserialize count as missing.
    pub fn load_fresh(&self, max_age: Duration) -> Result<Option<CatalogConfiguration>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT fetched_at, json_data FROM catalog_config WHERE key = ?1",
                [CONFIGURATION_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (fetched_at, json_data) = match row {
            Some(row) => row,
            None => return Ok(None),
        };
        let age = now_secs().saturating_sub(fetched_at);
        if age < 0 || age as u64 >= max_age.as_secs() {
            log::debug!("Cached catalog configuration is stale ({age}s old)");
            return Ok(None);
        }
        Ok(serde_json::from_str(&json_data).ok())
    }
}

/// Cached configuration when fresh, otherwise fetched from `client` and stored.
pub async fn cached_configuration(
    client: &TmdbClient,
    cache: &ConfigCache,
    max_age: Duration,
) -> std::result::Result<CatalogConfiguration, MatchError> {
    if let Some(config) = cache.load_fresh(max_age)? {
        log::info!(target: "cli", "Using cached catalog configuration");
        return Ok(config);
    }
    let config = client.configuration().await?;
    if let Err(e) = cache.store(&config) {
        log::error!("Failed to store catalog configuration in cache: {}", e);
    }
    Ok(config)
}
