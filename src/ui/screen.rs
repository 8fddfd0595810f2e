//! Terminal screen bound to a [`SleepTracker`].
//!
//! The screen observes the tracker, forwards list changes to the adapter,
//! and acts on every one-shot event before consuming it.

use crate::core::adapter::{ListRenderer, NightListAdapter};
use crate::core::live::Subscription;
use crate::core::projection::{DisplayItem, SleepNightListener};
use crate::core::tracker::SleepTracker;
use crate::errors::PersistenceError;
use crate::ui::messages;
use crate::utils::colors::{GREEN, GREY, RESET};
use std::sync::{Arc, Mutex, PoisonError};

pub const SNACKBAR_TEXT: &str = "All your data is gone forever.";

/// Where an event asked the user to go.
pub trait Navigator: Send + Sync {
    fn open_sleep_quality(&self, night_id: i64);
    fn open_sleep_detail(&self, night_id: i64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SleepQuality(i64),
    SleepDetail(i64),
}

/// Remembers the last requested destination so the command can follow it.
#[derive(Default)]
pub struct CliNavigator {
    destination: Mutex<Option<Destination>>,
}

impl CliNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_destination(&self) -> Option<Destination> {
        self.destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn go(&self, destination: Destination) {
        *self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(destination);
    }
}

impl Navigator for CliNavigator {
    fn open_sleep_quality(&self, night_id: i64) {
        messages::info(format!(
            "Rate night #{night_id} with: sleeptracker quality {night_id} <0-5>"
        ));
        self.go(Destination::SleepQuality(night_id));
    }

    fn open_sleep_detail(&self, night_id: i64) {
        tracing::debug!(night_id, "opening night detail");
        self.go(Destination::SleepDetail(night_id));
    }
}

pub struct TrackerScreen {
    tracker: Arc<SleepTracker>,
    adapter: Arc<NightListAdapter>,
    renderer: Arc<dyn ListRenderer + Send + Sync>,
    listener: SleepNightListener,
    last_error: Arc<Mutex<Option<PersistenceError>>>,
    _subscriptions: Vec<Subscription>,
}

impl TrackerScreen {
    /// Must be called from within a tokio runtime.
    pub fn bind(
        tracker: Arc<SleepTracker>,
        renderer: Arc<dyn ListRenderer + Send + Sync>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let adapter = Arc::new(NightListAdapter::new());
        let last_error = Arc::new(Mutex::new(None));
        let mut subscriptions = Vec::new();

        let list = Arc::clone(&adapter);
        subscriptions.push(
            tracker
                .nights()
                .observe(move |nights| list.add_header_and_submit_list(Some(nights.clone()))),
        );

        let event = tracker.navigate_to_sleep_quality().clone();
        let nav = Arc::clone(&navigator);
        subscriptions.push(tracker.navigate_to_sleep_quality().observe(move |night| {
            nav.open_sleep_quality(night.night_id);
            event.consume();
        }));

        let event = tracker.navigate_to_sleep_detail().clone();
        let nav = Arc::clone(&navigator);
        subscriptions.push(tracker.navigate_to_sleep_detail().observe(move |night_id| {
            nav.open_sleep_detail(*night_id);
            event.consume();
        }));

        let event = tracker.show_snackbar_event().clone();
        subscriptions.push(tracker.show_snackbar_event().observe(move |_| {
            messages::snackbar(SNACKBAR_TEXT);
            event.consume();
        }));

        let event = tracker.persistence_error().clone();
        let errors = Arc::clone(&last_error);
        subscriptions.push(tracker.persistence_error().observe(move |error| {
            messages::error(error);
            *errors.lock().unwrap_or_else(PoisonError::into_inner) = Some(error.clone());
            event.consume();
        }));

        let clicked = Arc::downgrade(&tracker);
        let listener = SleepNightListener::new(move |night_id| {
            if let Some(tracker) = clicked.upgrade() {
                tracker.on_sleep_night_clicked(night_id);
            }
        });

        Self {
            tracker,
            adapter,
            renderer,
            listener,
            last_error,
            _subscriptions: subscriptions,
        }
    }

    pub fn tracker(&self) -> &SleepTracker {
        &self.tracker
    }

    pub fn adapter(&self) -> &NightListAdapter {
        &self.adapter
    }

    /// Wait for pending projections and draw the newest one.
    pub async fn render(&self) -> bool {
        self.adapter.settle().await;
        self.adapter.publish(self.renderer.as_ref())
    }

    /// Click on the displayed cell of `night_id`. False when no such cell
    /// is on screen.
    pub fn click(&self, night_id: i64) -> bool {
        let night = self
            .adapter
            .current_list()
            .into_iter()
            .find_map(|item| match item {
                DisplayItem::Night(n) if n.night_id == night_id => Some(n),
                _ => None,
            });
        match night {
            Some(night) => {
                self.listener.on_click(&night);
                true
            }
            None => false,
        }
    }

    /// Last persistence error shown on this screen, if any.
    pub fn take_error(&self) -> Option<PersistenceError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn print_buttons(&self) {
        let button = |label: &str, enabled: bool| {
            if enabled {
                format!("{GREEN}[{label}]{RESET}")
            } else {
                format!("{GREY}[{label}]{RESET}")
            }
        };
        println!(
            "{} {} {}",
            button("start", self.tracker.start_enabled().get()),
            button("stop", self.tracker.stop_enabled().get()),
            button("clear", self.tracker.clear_enabled().get()),
        );
    }
}
