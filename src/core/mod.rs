pub mod adapter;
pub mod clock;
pub mod detail;
pub mod event;
pub mod live;
pub mod log;
pub mod projection;
pub mod quality;
pub mod scope;
pub mod tracker;

pub use adapter::{ListRenderer, NightListAdapter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::UiEvent;
pub use live::{LiveValue, Subscription};
pub use projection::{DisplayItem, HEADER_ID, ListUpdate};
pub use tracker::{SessionState, SleepTracker};
