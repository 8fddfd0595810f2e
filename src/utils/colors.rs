/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Quality color:
/// 0-1 → red
/// 2-3 → yellow
/// 4-5 → green
/// unset → grey
pub fn color_for_quality(value: i32) -> &'static str {
    match value {
        0 | 1 => RED,
        2 | 3 => YELLOW,
        4 | 5 => GREEN,
        _ => GREY,
    }
}

/// Open nights are highlighted, closed ones use the default color.
pub fn color_for_open(open: bool) -> &'static str {
    if open { CYAN } else { RESET }
}
