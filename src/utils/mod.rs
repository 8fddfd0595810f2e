pub mod colors;
pub mod formatting;
pub mod path;

pub use formatting::{format_nights, millis2readable};
