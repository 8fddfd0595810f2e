pub mod quality;
pub mod sleep_night;

pub use quality::SleepQuality;
pub use sleep_night::SleepNight;
