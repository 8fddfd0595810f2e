//! Command handlers.
//!
//! Commands that act on the tracker screen share one [`TrackerContext`]: a
//! SQLite-backed tracker, the grid renderer and the terminal navigator,
//! bound together the same way a screen binds its state holder.

pub mod clear;
pub mod config;
pub mod db;
pub mod detail;
pub mod init;
pub mod list;
pub mod log;
pub mod quality;
pub mod start;
pub mod stop;

use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::tracker::SleepTracker;
use crate::db::SqliteSleepDao;
use crate::errors::AppResult;
use crate::ui::grid::GridRenderer;
use crate::ui::screen::{CliNavigator, TrackerScreen};
use std::sync::Arc;

pub(crate) struct TrackerContext {
    pub dao: Arc<SqliteSleepDao>,
    pub tracker: Arc<SleepTracker>,
    pub navigator: Arc<CliNavigator>,
    pub screen: TrackerScreen,
}

impl TrackerContext {
    /// Open the configured database and wait for the session to be restored.
    pub async fn open(cfg: &Config) -> AppResult<Self> {
        let dao = Arc::new(SqliteSleepDao::open(&cfg.database)?);
        let tracker = Arc::new(SleepTracker::with_date_format(
            dao.clone(),
            Arc::new(SystemClock),
            cfg.date_format.clone(),
        ));
        let renderer = Arc::new(GridRenderer::new(cfg.grid_columns, cfg.date_format.clone()));
        let navigator = Arc::new(CliNavigator::new());
        let screen = TrackerScreen::bind(tracker.clone(), renderer, navigator.clone());

        tracker.settled().await;
        Ok(Self {
            dao,
            tracker,
            navigator,
            screen,
        })
    }

    /// Wait for outstanding work, tear the tracker down and surface the
    /// last persistence error, if one was shown.
    pub async fn finish(self) -> AppResult<()> {
        self.tracker.settled().await;
        let error = self.screen.take_error();
        self.tracker.dispose();
        match error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
