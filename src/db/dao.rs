//! The persistence collaborator consumed by the state holders.
//!
//! Calls are synchronous; the state holders always dispatch them onto the
//! blocking pool, never onto the task that owns the observable state.

use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppResult, PersistenceError, PersistenceResult};
use crate::models::SleepNight;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

pub trait SleepDatabaseDao: Send + Sync {
    /// Insert a new night, returning its assigned id.
    fn insert(&self, night: &SleepNight) -> PersistenceResult<i64>;

    /// Replace the stored fields of `night.night_id`. Unknown ids are ignored.
    fn update(&self, night: &SleepNight) -> PersistenceResult<()>;

    fn get(&self, night_id: i64) -> PersistenceResult<Option<SleepNight>>;

    /// Most recent night, whether open or closed.
    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>>;

    fn clear(&self) -> PersistenceResult<()>;

    /// All nights, newest first.
    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>>;

    /// Live view of [`get_all_nights`](Self::get_all_nights), republished
    /// after every write.
    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>>;
}

/// SQLite implementation backed by `daily_sleep_quality_table`.
pub struct SqliteSleepDao {
    pool: Mutex<DbPool>,
    nights: watch::Sender<Vec<SleepNight>>,
}

impl SqliteSleepDao {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        let all = queries::get_all_nights(&pool.conn)?;
        let (nights, _) = watch::channel(all);
        Ok(Self {
            pool: Mutex::new(pool),
            nights,
        })
    }

    fn conn(&self) -> MutexGuard<'_, DbPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Republish the table after a committed write. A failed read leaves the
    /// previous snapshot in place; the write itself already succeeded.
    fn publish(&self, conn: &Connection) {
        match queries::get_all_nights(conn) {
            Ok(all) => {
                self.nights.send_replace(all);
            }
            Err(e) => tracing::warn!(error = %e, "nights written but not republished"),
        }
    }
}

impl SleepDatabaseDao for SqliteSleepDao {
    fn insert(&self, night: &SleepNight) -> PersistenceResult<i64> {
        let pool = self.conn();
        let id = queries::insert_night(&pool.conn, night)
            .map_err(|e| PersistenceError::new("insert", e))?;
        ttlog_quiet(
            &pool.conn,
            "start",
            &format!("night {id}"),
            "Sleep tracking started",
        );
        self.publish(&pool.conn);
        Ok(id)
    }

    fn update(&self, night: &SleepNight) -> PersistenceResult<()> {
        let pool = self.conn();
        let touched = queries::update_night(&pool.conn, night)
            .map_err(|e| PersistenceError::new("update", e))?;
        if touched == 0 {
            tracing::debug!(night_id = night.night_id, "update matched no night");
            return Ok(());
        }
        let message = if night.is_rated() {
            format!("Night updated (quality {})", night.sleep_quality)
        } else {
            "Night updated".to_string()
        };
        ttlog_quiet(
            &pool.conn,
            "update",
            &format!("night {}", night.night_id),
            &message,
        );
        self.publish(&pool.conn);
        Ok(())
    }

    fn get(&self, night_id: i64) -> PersistenceResult<Option<SleepNight>> {
        let pool = self.conn();
        queries::get_night(&pool.conn, night_id).map_err(|e| PersistenceError::new("get", e))
    }

    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>> {
        let pool = self.conn();
        queries::get_tonight(&pool.conn).map_err(|e| PersistenceError::new("get_tonight", e))
    }

    fn clear(&self) -> PersistenceResult<()> {
        let pool = self.conn();
        let removed =
            queries::clear_nights(&pool.conn).map_err(|e| PersistenceError::new("clear", e))?;
        ttlog_quiet(
            &pool.conn,
            "clear",
            "",
            &format!("Cleared {removed} night(s)"),
        );
        self.publish(&pool.conn);
        Ok(())
    }

    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>> {
        let pool = self.conn();
        queries::get_all_nights(&pool.conn).map_err(|e| PersistenceError::new("get_all_nights", e))
    }

    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.nights.subscribe()
    }
}
