//! In-process DAO with the same contract as the SQLite one.

use crate::db::dao::SleepDatabaseDao;
use crate::errors::PersistenceResult;
use crate::models::SleepNight;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

#[derive(Default)]
struct Store {
    last_id: i64,
    // insertion order, oldest first
    nights: Vec<SleepNight>,
}

impl Store {
    fn newest_first(&self) -> Vec<SleepNight> {
        self.nights.iter().rev().cloned().collect()
    }
}

pub struct MemorySleepDao {
    store: Mutex<Store>,
    nights: watch::Sender<Vec<SleepNight>>,
}

impl Default for MemorySleepDao {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySleepDao {
    pub fn new() -> Self {
        let (nights, _) = watch::channel(Vec::new());
        Self {
            store: Mutex::new(Store::default()),
            nights,
        }
    }

    /// Seed the store, assigning ids in order.
    pub fn with_nights(seed: Vec<SleepNight>) -> Self {
        let dao = Self::new();
        {
            let mut store = dao.lock();
            for mut night in seed {
                store.last_id += 1;
                night.night_id = store.last_id;
                store.nights.push(night);
            }
            dao.nights.send_replace(store.newest_first());
        }
        dao
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SleepDatabaseDao for MemorySleepDao {
    fn insert(&self, night: &SleepNight) -> PersistenceResult<i64> {
        let mut store = self.lock();
        store.last_id += 1;
        let id = store.last_id;
        store.nights.push(SleepNight {
            night_id: id,
            ..night.clone()
        });
        self.nights.send_replace(store.newest_first());
        Ok(id)
    }

    fn update(&self, night: &SleepNight) -> PersistenceResult<()> {
        let mut store = self.lock();
        if let Some(slot) = store
            .nights
            .iter_mut()
            .find(|n| n.night_id == night.night_id)
        {
            *slot = night.clone();
            self.nights.send_replace(store.newest_first());
        }
        Ok(())
    }

    fn get(&self, night_id: i64) -> PersistenceResult<Option<SleepNight>> {
        Ok(self
            .lock()
            .nights
            .iter()
            .find(|n| n.night_id == night_id)
            .cloned())
    }

    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>> {
        Ok(self.lock().nights.last().cloned())
    }

    fn clear(&self) -> PersistenceResult<()> {
        let mut store = self.lock();
        store.nights.clear();
        self.nights.send_replace(Vec::new());
        Ok(())
    }

    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>> {
        Ok(self.lock().newest_first())
    }

    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.nights.subscribe()
    }
}
