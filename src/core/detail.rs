//! State holder for the night detail screen.

use crate::core::event::UiEvent;
use crate::core::live::LiveValue;
use crate::core::scope::{TaskScope, on_io};
use crate::db::dao::SleepDatabaseDao;
use crate::errors::PersistenceError;
use crate::models::SleepNight;
use std::sync::Arc;

pub struct SleepDetail {
    night_id: i64,
    night: LiveValue<Option<SleepNight>>,
    navigate_to_sleep_tracker: UiEvent<()>,
    persistence_error: UiEvent<PersistenceError>,
    scope: TaskScope,
}

impl SleepDetail {
    /// Starts loading the night right away. Must be called from within a
    /// tokio runtime.
    pub fn new(dao: Arc<dyn SleepDatabaseDao>, night_id: i64) -> Self {
        let scope = TaskScope::new("sleep-detail");
        let night = LiveValue::new(None);
        let persistence_error = UiEvent::new();

        let guard = scope.guard();
        let target = night.clone();
        let errors = persistence_error.clone();
        scope.launch(async move {
            match on_io("get", move || dao.get(night_id)).await {
                Ok(found) if !guard.is_cancelled() => target.set(found),
                Ok(_) => tracing::debug!(night_id, "detail screen disposed, night dropped"),
                Err(e) => {
                    tracing::warn!(night_id, error = %e, "failed to load night");
                    if !guard.is_cancelled() {
                        errors.set(e);
                    }
                }
            }
        });

        Self {
            night_id,
            night,
            navigate_to_sleep_tracker: UiEvent::new(),
            persistence_error,
            scope,
        }
    }

    pub fn night_id(&self) -> i64 {
        self.night_id
    }

    /// `None` until loaded, and when no such night exists.
    pub fn night(&self) -> &LiveValue<Option<SleepNight>> {
        &self.night
    }

    pub fn navigate_to_sleep_tracker(&self) -> &UiEvent<()> {
        &self.navigate_to_sleep_tracker
    }

    pub fn persistence_error(&self) -> &UiEvent<PersistenceError> {
        &self.persistence_error
    }

    pub fn on_close(&self) {
        self.navigate_to_sleep_tracker.set(());
    }

    pub fn done_navigating(&self) {
        self.navigate_to_sleep_tracker.consume();
    }

    pub async fn settled(&self) {
        self.scope.settled().await;
    }

    pub fn dispose(&self) {
        self.scope.dispose();
    }
}
