//! Session state holder for the tracker screen.
//!
//! Owns the current session, the live list of nights and every flag and
//! event the screen renders. All mutations run on the holder's task scope,
//! in the order the operations were issued.

use crate::core::clock::Clock;
use crate::core::event::UiEvent;
use crate::core::live::LiveValue;
use crate::core::scope::{ScopeGuard, TaskScope, on_io};
use crate::db::dao::SleepDatabaseDao;
use crate::errors::{PersistenceError, PersistenceResult};
use crate::models::SleepNight;
use crate::utils::formatting::{DEFAULT_DATE_FORMAT, format_nights};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Open(SleepNight),
    /// Stopped in this holder's lifetime; kept until the next start.
    Closed(SleepNight),
}

impl SessionState {
    /// Session state implied by the most recent stored night.
    pub fn from_tonight(night: Option<SleepNight>) -> Self {
        match night {
            Some(night) if night.is_open() => SessionState::Open(night),
            _ => SessionState::NoSession,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Open(_))
    }

    /// The open night, if any. A closed session has no "tonight".
    pub fn tonight(&self) -> Option<&SleepNight> {
        match self {
            SessionState::Open(night) => Some(night),
            _ => None,
        }
    }

    /// The night this session refers to, open or closed.
    pub fn night(&self) -> Option<&SleepNight> {
        match self {
            SessionState::NoSession => None,
            SessionState::Open(night) | SessionState::Closed(night) => Some(night),
        }
    }
}

struct TrackerState {
    dao: Arc<dyn SleepDatabaseDao>,
    clock: Arc<dyn Clock>,
    guard: ScopeGuard,
    session: LiveValue<SessionState>,
    nights: LiveValue<Vec<SleepNight>>,
    nights_source: watch::Receiver<Vec<SleepNight>>,
    navigate_to_sleep_quality: UiEvent<SleepNight>,
    navigate_to_sleep_detail: UiEvent<i64>,
    show_snackbar: UiEvent<()>,
    persistence_error: UiEvent<PersistenceError>,
}

pub struct SleepTracker {
    state: Arc<TrackerState>,
    nights_string: LiveValue<String>,
    start_enabled: LiveValue<bool>,
    stop_enabled: LiveValue<bool>,
    clear_enabled: LiveValue<bool>,
    scope: TaskScope,
}

impl SleepTracker {
    /// Must be called from within a tokio runtime. The initial session is
    /// loaded asynchronously; await [`settled`](Self::settled) to observe it.
    pub fn new(dao: Arc<dyn SleepDatabaseDao>, clock: Arc<dyn Clock>) -> Self {
        Self::with_date_format(dao, clock, DEFAULT_DATE_FORMAT)
    }

    pub fn with_date_format(
        dao: Arc<dyn SleepDatabaseDao>,
        clock: Arc<dyn Clock>,
        date_format: impl Into<String>,
    ) -> Self {
        let scope = TaskScope::new("sleep-tracker");
        let nights_source = dao.observe_all();
        let nights = LiveValue::new(nights_source.borrow().clone());
        let session = LiveValue::new(SessionState::NoSession);

        let date_format = date_format.into();
        let nights_string = nights.map(move |n| format_nights(n, &date_format));
        let start_enabled = session.map(|s| s.tonight().is_none());
        let stop_enabled = session.map(|s| s.tonight().is_some());
        let clear_enabled = nights.map(|n| !n.is_empty());

        let state = Arc::new(TrackerState {
            dao,
            clock,
            guard: scope.guard(),
            session,
            nights,
            nights_source,
            navigate_to_sleep_quality: UiEvent::new(),
            navigate_to_sleep_detail: UiEvent::new(),
            show_snackbar: UiEvent::new(),
            persistence_error: UiEvent::new(),
        });

        let init = Arc::clone(&state);
        scope.launch(async move { init.initialize_tonight().await });

        // writes from anyone sharing the DAO reach the list through the worker
        let forward = Arc::clone(&state);
        let launcher = scope.launcher();
        let mut changes = state.nights_source.clone();
        let guard = scope.guard();
        scope.spawn(async move {
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = Arc::clone(&forward);
                        launcher.launch(async move { state.refresh_nights() });
                    }
                }
            }
        });

        Self {
            state,
            nights_string,
            start_enabled,
            stop_enabled,
            clear_enabled,
            scope,
        }
    }

    // ---------------------------
    // Observables
    // ---------------------------

    pub fn nights(&self) -> &LiveValue<Vec<SleepNight>> {
        &self.state.nights
    }

    pub fn nights_string(&self) -> &LiveValue<String> {
        &self.nights_string
    }

    pub fn session(&self) -> &LiveValue<SessionState> {
        &self.state.session
    }

    /// The night being tracked right now.
    pub fn tonight(&self) -> Option<SleepNight> {
        self.state.session.with(|s| s.tonight().cloned())
    }

    pub fn start_enabled(&self) -> &LiveValue<bool> {
        &self.start_enabled
    }

    pub fn stop_enabled(&self) -> &LiveValue<bool> {
        &self.stop_enabled
    }

    pub fn clear_enabled(&self) -> &LiveValue<bool> {
        &self.clear_enabled
    }

    pub fn navigate_to_sleep_quality(&self) -> &UiEvent<SleepNight> {
        &self.state.navigate_to_sleep_quality
    }

    pub fn navigate_to_sleep_detail(&self) -> &UiEvent<i64> {
        &self.state.navigate_to_sleep_detail
    }

    pub fn show_snackbar_event(&self) -> &UiEvent<()> {
        &self.state.show_snackbar
    }

    pub fn persistence_error(&self) -> &UiEvent<PersistenceError> {
        &self.state.persistence_error
    }

    // ---------------------------
    // Click handlers
    // ---------------------------

    pub fn on_start_tracking(&self) {
        let state = Arc::clone(&self.state);
        self.scope.launch(async move { state.start_tracking().await });
    }

    pub fn on_stop_tracking(&self) {
        let state = Arc::clone(&self.state);
        self.scope.launch(async move { state.stop_tracking().await });
    }

    /// Clears every night. The snackbar is raised right away, before the
    /// delete has completed.
    pub fn on_clear(&self) {
        let state = Arc::clone(&self.state);
        self.scope.launch(async move { state.clear().await });
        self.state.show_snackbar.set(());
    }

    pub fn on_sleep_night_clicked(&self, night_id: i64) {
        self.state.navigate_to_sleep_detail.set(night_id);
    }

    // ---------------------------
    // Event acknowledgements
    // ---------------------------

    pub fn done_navigating(&self) {
        self.state.navigate_to_sleep_quality.consume();
    }

    pub fn on_sleep_detail_navigated(&self) {
        self.state.navigate_to_sleep_detail.consume();
    }

    pub fn done_showing_snackbar(&self) {
        self.state.show_snackbar.consume();
    }

    pub fn done_showing_error(&self) {
        self.state.persistence_error.consume();
    }

    // ---------------------------
    // Lifecycle
    // ---------------------------

    /// Resolves once every operation issued before this call has finished.
    pub async fn settled(&self) {
        self.scope.settled().await;
    }

    /// Cancel all pending work. Results arriving afterwards are discarded.
    pub fn dispose(&self) {
        self.scope.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.scope.is_disposed()
    }
}

impl TrackerState {
    fn alive(&self, operation: &'static str) -> bool {
        let alive = !self.guard.is_cancelled();
        if !alive {
            tracing::debug!(operation, "tracker disposed, result discarded");
        }
        alive
    }

    fn report(&self, error: PersistenceError) {
        tracing::warn!(operation = error.operation, error = %error.message, "persistence call failed");
        if self.alive(error.operation) {
            self.persistence_error.set(error);
        }
    }

    fn refresh_nights(&self) {
        let latest = self.nights_source.borrow().clone();
        self.nights.set_if_changed(latest);
    }

    async fn tonight_from_database(&self) -> PersistenceResult<SessionState> {
        let dao = Arc::clone(&self.dao);
        let night = on_io("get_tonight", move || dao.get_tonight()).await?;
        Ok(SessionState::from_tonight(night))
    }

    async fn initialize_tonight(&self) {
        match self.tonight_from_database().await {
            Ok(session) => {
                if self.alive("initialize") {
                    self.session.set(session);
                }
            }
            Err(e) => self.report(e),
        }
    }

    async fn start_tracking(&self) {
        if self.session.with(SessionState::is_open) {
            tracing::warn!("start requested while a night is still open, ignored");
            return;
        }

        let night = SleepNight::new(self.clock.now_millis());
        let dao = Arc::clone(&self.dao);
        let stored = night.clone();
        let night_id = match on_io("insert", move || dao.insert(&stored)).await {
            Ok(id) => id,
            Err(e) => return self.report(e),
        };
        if !self.alive("insert") {
            return;
        }
        self.refresh_nights();

        // the row is stored either way, so the session must open
        let session = match self.tonight_from_database().await {
            Ok(session) => session,
            Err(e) => {
                self.report(e);
                SessionState::Open(SleepNight { night_id, ..night })
            }
        };
        if self.alive("get_tonight") {
            self.session.set(session);
        }
    }

    async fn stop_tracking(&self) {
        let SessionState::Open(mut night) = self.session.get() else {
            tracing::debug!("stop requested without an open night, ignored");
            return;
        };

        night.close(self.clock.now_millis());

        let dao = Arc::clone(&self.dao);
        let update = night.clone();
        if let Err(e) = on_io("update", move || dao.update(&update)).await {
            return self.report(e);
        }
        if !self.alive("update") {
            return;
        }
        self.refresh_nights();

        self.session.set(SessionState::Closed(night.clone()));
        self.navigate_to_sleep_quality.set(night);
    }

    async fn clear(&self) {
        let dao = Arc::clone(&self.dao);
        if let Err(e) = on_io("clear", move || dao.clear()).await {
            return self.report(e);
        }
        if !self.alive("clear") {
            return;
        }
        self.refresh_nights();
        self.session.set(SessionState::NoSession);
    }
}
