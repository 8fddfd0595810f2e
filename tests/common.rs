#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use sleeptracker::core::adapter::ListRenderer;
use sleeptracker::core::projection::{DisplayItem, ListUpdate};
use sleeptracker::models::SleepNight;
use sleeptracker::ui::screen::Navigator;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub fn sleeptracker() -> Command {
    cargo_bin_cmd!("sleeptracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_sleeptracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a fresh DB through the CLI
pub fn init_db(db_path: &str) {
    sleeptracker()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// A closed night `[start, end)` with the given rating.
pub fn night(start: i64, end: i64, quality: i32) -> SleepNight {
    SleepNight {
        night_id: 0,
        start_time_milli: start,
        end_time_milli: end,
        sleep_quality: quality,
    }
}

/// Renderer that only records what it was given.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<(Vec<DisplayItem>, Vec<ListUpdate>)>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<(Vec<DisplayItem>, Vec<ListUpdate>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ListRenderer for RecordingRenderer {
    fn submit(&self, items: &[DisplayItem], updates: &[ListUpdate]) {
        self.calls
            .lock()
            .unwrap()
            .push((items.to_vec(), updates.to_vec()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    Quality(i64),
    Detail(i64),
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: Mutex<Vec<Opened>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<Opened> {
        self.opened.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_sleep_quality(&self, night_id: i64) {
        self.opened.lock().unwrap().push(Opened::Quality(night_id));
    }

    fn open_sleep_detail(&self, night_id: i64) {
        self.opened.lock().unwrap().push(Opened::Detail(night_id));
    }
}
