//! State holder for the quality rating screen.

use crate::core::event::UiEvent;
use crate::core::scope::{ScopeGuard, TaskScope, on_io};
use crate::db::dao::SleepDatabaseDao;
use crate::errors::PersistenceError;
use crate::models::SleepQuality;
use std::sync::Arc;

struct QualityState {
    dao: Arc<dyn SleepDatabaseDao>,
    night_id: i64,
    guard: ScopeGuard,
    navigate_to_sleep_tracker: UiEvent<()>,
    persistence_error: UiEvent<PersistenceError>,
}

pub struct SleepQualityTracker {
    state: Arc<QualityState>,
    scope: TaskScope,
}

impl SleepQualityTracker {
    /// Must be called from within a tokio runtime.
    pub fn new(dao: Arc<dyn SleepDatabaseDao>, night_id: i64) -> Self {
        let scope = TaskScope::new("sleep-quality");
        let state = Arc::new(QualityState {
            dao,
            night_id,
            guard: scope.guard(),
            navigate_to_sleep_tracker: UiEvent::new(),
            persistence_error: UiEvent::new(),
        });
        Self { state, scope }
    }

    pub fn night_id(&self) -> i64 {
        self.state.night_id
    }

    pub fn navigate_to_sleep_tracker(&self) -> &UiEvent<()> {
        &self.state.navigate_to_sleep_tracker
    }

    pub fn persistence_error(&self) -> &UiEvent<PersistenceError> {
        &self.state.persistence_error
    }

    /// Store `quality` on the night, then head back to the tracker.
    pub fn on_set_sleep_quality(&self, quality: SleepQuality) {
        let state = Arc::clone(&self.state);
        self.scope.launch(async move { state.set_quality(quality).await });
    }

    pub fn done_navigating(&self) {
        self.state.navigate_to_sleep_tracker.consume();
    }

    pub async fn settled(&self) {
        self.scope.settled().await;
    }

    pub fn dispose(&self) {
        self.scope.dispose();
    }
}

impl QualityState {
    fn report(&self, error: PersistenceError) {
        tracing::warn!(operation = error.operation, error = %error.message, "persistence call failed");
        if !self.guard.is_cancelled() {
            self.persistence_error.set(error);
        }
    }

    async fn set_quality(&self, quality: SleepQuality) {
        let dao = Arc::clone(&self.dao);
        let night_id = self.night_id;
        let night = match on_io("get", move || dao.get(night_id)).await {
            Ok(Some(night)) => night,
            Ok(None) => {
                return self.report(PersistenceError::new(
                    "get",
                    format!("no night with id {night_id}"),
                ));
            }
            Err(e) => return self.report(e),
        };

        let mut rated = night;
        rated.sleep_quality = quality.value();

        let dao = Arc::clone(&self.dao);
        if let Err(e) = on_io("update", move || dao.update(&rated)).await {
            return self.report(e);
        }

        if self.guard.is_cancelled() {
            tracing::debug!(night_id, "quality screen disposed, navigation dropped");
            return;
        }
        self.navigate_to_sleep_tracker.set(());
    }
}
