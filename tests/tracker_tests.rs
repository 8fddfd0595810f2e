use sleeptracker::core::clock::ManualClock;
use sleeptracker::core::tracker::{SessionState, SleepTracker};
use sleeptracker::db::{MemorySleepDao, SleepDatabaseDao};
use sleeptracker::errors::{PersistenceError, PersistenceResult};
use sleeptracker::models::SleepNight;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;
use tokio::sync::watch;

mod common;
use common::night;

const T0: i64 = 1_700_000_000_000;

fn tracker_on(dao: Arc<MemorySleepDao>) -> (SleepTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let tracker = SleepTracker::new(dao, clock.clone());
    (tracker, clock)
}

/// DAO whose writes always fail.
struct FailingDao {
    nights: watch::Sender<Vec<SleepNight>>,
}

impl FailingDao {
    fn new() -> Self {
        Self {
            nights: watch::channel(Vec::new()).0,
        }
    }
}

impl SleepDatabaseDao for FailingDao {
    fn insert(&self, _night: &SleepNight) -> PersistenceResult<i64> {
        Err(PersistenceError::new("insert", "disk full"))
    }
    fn update(&self, _night: &SleepNight) -> PersistenceResult<()> {
        Err(PersistenceError::new("update", "disk full"))
    }
    fn get(&self, _night_id: i64) -> PersistenceResult<Option<SleepNight>> {
        Ok(None)
    }
    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>> {
        Ok(None)
    }
    fn clear(&self) -> PersistenceResult<()> {
        Err(PersistenceError::new("clear", "database is locked"))
    }
    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>> {
        Ok(Vec::new())
    }
    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.nights.subscribe()
    }
}

/// DAO whose inserts block until the test opens the gate.
struct GatedDao {
    inner: MemorySleepDao,
    entered: AtomicBool,
    gate: (Mutex<bool>, Condvar),
}

impl GatedDao {
    fn new() -> Self {
        Self {
            inner: MemorySleepDao::new(),
            entered: AtomicBool::new(false),
            gate: (Mutex::new(false), Condvar::new()),
        }
    }

    fn open_gate(&self) {
        *self.gate.0.lock().unwrap() = true;
        self.gate.1.notify_all();
    }
}

impl SleepDatabaseDao for GatedDao {
    fn insert(&self, night: &SleepNight) -> PersistenceResult<i64> {
        self.entered.store(true, Ordering::SeqCst);
        let mut open = self.gate.0.lock().unwrap();
        while !*open {
            open = self.gate.1.wait(open).unwrap();
        }
        drop(open);
        self.inner.insert(night)
    }
    fn update(&self, night: &SleepNight) -> PersistenceResult<()> {
        self.inner.update(night)
    }
    fn get(&self, night_id: i64) -> PersistenceResult<Option<SleepNight>> {
        self.inner.get(night_id)
    }
    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>> {
        self.inner.get_tonight()
    }
    fn clear(&self) -> PersistenceResult<()> {
        self.inner.clear()
    }
    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>> {
        self.inner.get_all_nights()
    }
    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.inner.observe_all()
    }
}

/// DAO whose writes land but whose reads fail afterwards.
struct UnreadableDao {
    inner: MemorySleepDao,
}

impl SleepDatabaseDao for UnreadableDao {
    fn insert(&self, night: &SleepNight) -> PersistenceResult<i64> {
        self.inner.insert(night)
    }
    fn update(&self, night: &SleepNight) -> PersistenceResult<()> {
        self.inner.update(night)
    }
    fn get(&self, _night_id: i64) -> PersistenceResult<Option<SleepNight>> {
        Err(PersistenceError::new("get", "database disk image is malformed"))
    }
    fn get_tonight(&self) -> PersistenceResult<Option<SleepNight>> {
        if self.inner.get_all_nights()?.is_empty() {
            return Ok(None);
        }
        Err(PersistenceError::new(
            "get_tonight",
            "database disk image is malformed",
        ))
    }
    fn clear(&self) -> PersistenceResult<()> {
        self.inner.clear()
    }
    fn get_all_nights(&self) -> PersistenceResult<Vec<SleepNight>> {
        self.inner.get_all_nights()
    }
    fn observe_all(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.inner.observe_all()
    }
}

#[tokio::test]
async fn test_empty_database_only_allows_start() {
    let (tracker, _) = tracker_on(Arc::new(MemorySleepDao::new()));
    tracker.settled().await;

    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(tracker.nights().get().is_empty());
    assert!(tracker.start_enabled().get());
    assert!(!tracker.stop_enabled().get());
    assert!(!tracker.clear_enabled().get());
    assert!(!tracker.navigate_to_sleep_quality().is_pending());
    assert!(!tracker.show_snackbar_event().is_pending());
}

#[tokio::test]
async fn test_start_opens_a_night() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, _) = tracker_on(dao.clone());

    tracker.on_start_tracking();
    tracker.settled().await;

    let tonight = tracker.tonight().expect("open night");
    assert_eq!(tonight.night_id, 1);
    assert_eq!(tonight.start_time_milli, T0);
    assert!(tonight.is_open());
    assert!(!tonight.is_rated());
    assert!(tracker.session().get().is_open());

    assert_eq!(tracker.nights().get(), vec![tonight]);
    assert!(!tracker.start_enabled().get());
    assert!(tracker.stop_enabled().get());
    assert!(tracker.clear_enabled().get());
    assert_eq!(dao.get_all_nights().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stop_closes_night_and_requests_rating() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, clock) = tracker_on(dao.clone());

    tracker.on_start_tracking();
    tracker.settled().await;
    clock.advance(8 * 3_600_000);
    tracker.on_stop_tracking();
    tracker.settled().await;

    let stopped = tracker.navigate_to_sleep_quality().peek().expect("navigation");
    assert_eq!(stopped.night_id, 1);
    assert_eq!(stopped.end_time_milli, T0 + 8 * 3_600_000);
    assert!(!stopped.is_open());

    assert_eq!(tracker.session().get(), SessionState::Closed(stopped.clone()));
    assert_eq!(tracker.tonight(), None);
    assert!(tracker.start_enabled().get());
    assert!(!tracker.stop_enabled().get());
    assert_eq!(dao.get(1).unwrap(), Some(stopped));

    tracker.done_navigating();
    assert!(!tracker.navigate_to_sleep_quality().is_pending());
}

#[tokio::test]
async fn test_stop_in_the_same_millisecond_still_closes() {
    let (tracker, _) = tracker_on(Arc::new(MemorySleepDao::new()));

    tracker.on_start_tracking();
    tracker.on_stop_tracking();
    tracker.settled().await;

    assert_eq!(tracker.tonight(), None);
    let session = tracker.session().get();
    let night = session.night().unwrap();
    assert!(!night.is_open());
    assert_eq!(night.duration_milli(), 1);
}

#[tokio::test]
async fn test_nights_string_follows_the_list() {
    let (tracker, clock) = tracker_on(Arc::new(MemorySleepDao::new()));
    tracker.settled().await;
    assert_eq!(tracker.nights_string().get(), "Here is your sleep data:\n");

    tracker.on_start_tracking();
    tracker.settled().await;
    clock.advance(60_000);
    tracker.on_stop_tracking();
    tracker.settled().await;

    let text = tracker.nights_string().get();
    assert!(text.starts_with("Here is your sleep data:"));
    assert!(text.contains("Quality: --"));
    assert!(text.contains("Hours:Minutes:Seconds: 00h 01m 00s"));
}

#[tokio::test]
async fn test_start_while_open_is_ignored() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, clock) = tracker_on(dao.clone());

    tracker.on_start_tracking();
    tracker.settled().await;
    clock.advance(1_000);
    tracker.on_start_tracking();
    tracker.settled().await;

    assert_eq!(dao.get_all_nights().unwrap().len(), 1);
    assert_eq!(tracker.tonight().unwrap().start_time_milli, T0);
}

#[tokio::test]
async fn test_stop_without_open_night_is_ignored() {
    let dao = Arc::new(MemorySleepDao::with_nights(vec![night(T0, T0 + 10, 3)]));
    let (tracker, _) = tracker_on(dao.clone());

    tracker.on_stop_tracking();
    tracker.settled().await;

    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(!tracker.navigate_to_sleep_quality().is_pending());
    assert_eq!(dao.get(1).unwrap().unwrap().end_time_milli, T0 + 10);
}

#[tokio::test]
async fn test_open_night_is_restored_on_creation() {
    let dao = Arc::new(MemorySleepDao::with_nights(vec![
        night(T0 - 86_400_000, T0 - 60_000_000, 4),
        SleepNight::new(T0),
    ]));
    let (tracker, _) = tracker_on(dao);
    tracker.settled().await;

    let tonight = tracker.tonight().unwrap();
    assert_eq!(tonight.night_id, 2);
    assert!(tracker.session().get().is_open());
    assert!(tracker.stop_enabled().get());
    assert!(!tracker.start_enabled().get());
    assert_eq!(tracker.nights().get().len(), 2);
}

#[tokio::test]
async fn test_closed_latest_night_is_not_a_session() {
    let dao = Arc::new(MemorySleepDao::with_nights(vec![night(T0, T0 + 1_000, 2)]));
    let (tracker, _) = tracker_on(dao);
    tracker.settled().await;

    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(tracker.start_enabled().get());
    assert!(tracker.clear_enabled().get());
}

#[tokio::test]
async fn test_clear_empties_list_and_shows_snackbar_once() {
    let dao = Arc::new(MemorySleepDao::with_nights(vec![
        night(T0, T0 + 1_000, 2),
        night(T0 + 2_000, T0 + 3_000, 5),
    ]));
    let (tracker, _) = tracker_on(dao.clone());
    tracker.settled().await;

    let shown = Arc::new(AtomicUsize::new(0));
    let sink = shown.clone();
    let _sub = tracker.show_snackbar_event().observe(move |_| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    tracker.on_clear();
    // raised before the delete has run
    assert!(tracker.show_snackbar_event().is_pending());
    tracker.settled().await;

    assert!(tracker.nights().get().is_empty());
    assert!(!tracker.clear_enabled().get());
    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(dao.get_all_nights().unwrap().is_empty());
    assert_eq!(shown.load(Ordering::SeqCst), 1);

    tracker.done_showing_snackbar();
    assert!(!tracker.show_snackbar_event().is_pending());
}

#[tokio::test]
async fn test_clear_during_open_session_resets_it() {
    let (tracker, _) = tracker_on(Arc::new(MemorySleepDao::new()));
    tracker.on_start_tracking();
    tracker.on_clear();
    tracker.settled().await;

    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(tracker.start_enabled().get());
    assert!(!tracker.stop_enabled().get());
}

#[tokio::test]
async fn test_click_requests_detail_navigation() {
    let (tracker, _) = tracker_on(Arc::new(MemorySleepDao::new()));

    tracker.on_sleep_night_clicked(7);
    assert_eq!(tracker.navigate_to_sleep_detail().peek(), Some(7));

    tracker.on_sleep_detail_navigated();
    assert_eq!(tracker.navigate_to_sleep_detail().peek(), None);
}

#[tokio::test]
async fn test_failed_write_raises_persistence_error() {
    let clock = Arc::new(ManualClock::new(T0));
    let tracker = SleepTracker::new(Arc::new(FailingDao::new()), clock);

    tracker.on_start_tracking();
    tracker.settled().await;

    let error = tracker.persistence_error().peek().expect("error");
    assert_eq!(error.operation, "insert");
    assert_eq!(error.message, "disk full");
    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(tracker.start_enabled().get());

    tracker.done_showing_error();
    assert!(!tracker.persistence_error().is_pending());
}

#[tokio::test]
async fn test_failed_clear_still_shows_snackbar_and_error() {
    let clock = Arc::new(ManualClock::new(T0));
    let tracker = SleepTracker::new(Arc::new(FailingDao::new()), clock);

    tracker.on_clear();
    tracker.settled().await;

    assert!(tracker.show_snackbar_event().is_pending());
    assert_eq!(tracker.persistence_error().peek().unwrap().operation, "clear");
}

#[tokio::test]
async fn test_writes_from_another_holder_reach_the_list() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, _) = tracker_on(dao.clone());
    tracker.settled().await;

    dao.insert(&night(T0, T0 + 5, -1)).unwrap();

    for _ in 0..200 {
        tracker.settled().await;
        if !tracker.nights().get().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(tracker.nights().get().len(), 1);
    assert!(tracker.clear_enabled().get());
}

#[tokio::test]
async fn test_dispose_before_work_runs() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, _) = tracker_on(dao.clone());

    tracker.on_start_tracking();
    tracker.dispose();
    tracker.settled().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(tracker.is_disposed());
    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(dao.get_all_nights().unwrap().is_empty());

    // ignored once disposed
    tracker.on_start_tracking();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(dao.get_all_nights().unwrap().is_empty());
}

#[tokio::test]
async fn test_dispose_discards_in_flight_result() {
    let dao = Arc::new(GatedDao::new());
    let clock = Arc::new(ManualClock::new(T0));
    let tracker = SleepTracker::new(dao.clone(), clock);
    tracker.settled().await;

    tracker.on_start_tracking();
    for _ in 0..400 {
        if dao.entered.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(dao.entered.load(Ordering::SeqCst));

    tracker.dispose();
    dao.open_gate();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // the write itself went through, its result did not
    assert_eq!(dao.get_all_nights().unwrap().len(), 1);
    assert_eq!(tracker.session().get(), SessionState::NoSession);
    assert!(tracker.nights().get().is_empty());
    assert!(!tracker.navigate_to_sleep_quality().is_pending());
}

#[tokio::test]
async fn test_stored_night_opens_session_even_if_reread_fails() {
    let dao = Arc::new(UnreadableDao {
        inner: MemorySleepDao::new(),
    });
    let clock = Arc::new(ManualClock::new(T0));
    let tracker = SleepTracker::new(dao.clone(), clock);
    tracker.settled().await;

    tracker.on_start_tracking();
    tracker.settled().await;

    assert_eq!(
        tracker.persistence_error().peek().unwrap().operation,
        "get_tonight"
    );
    let tonight = tracker.tonight().expect("session opened");
    assert_eq!(tonight.night_id, 1);
    assert_eq!(tonight.start_time_milli, T0);
    assert!(!tracker.start_enabled().get());
    assert!(tracker.stop_enabled().get());

    tracker.on_start_tracking();
    tracker.settled().await;
    assert_eq!(dao.get_all_nights().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dispose_stops_forwarding_outside_writes() {
    let dao = Arc::new(MemorySleepDao::new());
    let (tracker, _) = tracker_on(dao.clone());
    tracker.settled().await;

    tracker.dispose();
    dao.insert(&night(T0, T0 + 5, -1)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(tracker.nights().get().is_empty());
    assert!(!tracker.clear_enabled().get());
}
