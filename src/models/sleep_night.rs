use serde::Serialize;

/// Quality value stored while a night has not been rated yet.
pub const QUALITY_UNSET: i32 = -1;

/// One tracked night, mirrored 1:1 by a row of `daily_sleep_quality_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepNight {
    pub night_id: i64,         // ⇔ nightId (assigned on insert, 0 before)
    pub start_time_milli: i64, // ⇔ start_time_milli (epoch ms)
    pub end_time_milli: i64,   // ⇔ end_time_milli (== start while open)
    pub sleep_quality: i32,    // ⇔ quality_rating (-1 while unset)
}

impl SleepNight {
    /// A freshly started night: end equals start, quality unset.
    pub fn new(start_time_milli: i64) -> Self {
        Self {
            night_id: 0,
            start_time_milli,
            end_time_milli: start_time_milli,
            sleep_quality: QUALITY_UNSET,
        }
    }

    /// A night is open until it has been stopped.
    pub fn is_open(&self) -> bool {
        self.end_time_milli == self.start_time_milli
    }

    pub fn is_rated(&self) -> bool {
        self.sleep_quality != QUALITY_UNSET
    }

    /// Close the night at `now`. The end is kept strictly after the start so
    /// a stopped night never looks open again.
    pub fn close(&mut self, now_milli: i64) {
        self.end_time_milli = now_milli.max(self.start_time_milli + 1);
    }

    pub fn duration_milli(&self) -> i64 {
        self.end_time_milli - self.start_time_milli
    }
}
