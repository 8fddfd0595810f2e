//! Terminal renderer for the nights grid.

use crate::core::adapter::ListRenderer;
use crate::core::projection::{DisplayItem, ListUpdate, span_size};
use crate::models::{SleepNight, SleepQuality};
use crate::utils::colors::{RESET, color_for_open, color_for_quality};
use crate::utils::formatting::{bold, format_millis, millis2readable, pad_right, truncate};
use std::sync::{Mutex, PoisonError};

const CELL_WIDTH: usize = 24;
const HEADER_TEXT: &str = "Sleep Results";

/// Plain-text lines of one night cell (no colors, no padding).
pub fn night_cell(night: &SleepNight, date_format: &str) -> [String; 3] {
    let title = if night.is_open() {
        format!("#{} sleeping…", night.night_id)
    } else {
        format!(
            "#{} {}",
            night.night_id,
            SleepQuality::label_for(night.sleep_quality)
        )
    };
    let when = format_millis(night.start_time_milli, date_format);
    let length = if night.is_open() {
        "--".to_string()
    } else {
        millis2readable(night.duration_milli())
    };
    [title, when, length]
}

/// Lay the items out in rows: the header alone on the first row, nights
/// `columns` per row.
pub fn render_grid(items: &[DisplayItem], columns: usize, date_format: &str) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    let mut row: Vec<&SleepNight> = Vec::new();

    let flush = |row: &mut Vec<&SleepNight>, out: &mut String| {
        if row.is_empty() {
            return;
        }
        let cells: Vec<[String; 3]> = row.iter().map(|n| night_cell(n, date_format)).collect();
        for line in 0..3 {
            let mut text = String::new();
            for (night, cell) in row.iter().zip(&cells) {
                let color = if line == 0 && !night.is_open() {
                    color_for_quality(night.sleep_quality)
                } else {
                    color_for_open(night.is_open())
                };
                let shown = pad_right(&truncate(&cell[line], CELL_WIDTH), CELL_WIDTH);
                text.push_str(&format!("{color}{shown}{RESET} "));
            }
            out.push_str(text.trim_end());
            out.push('\n');
        }
        out.push('\n');
        row.clear();
    };

    for (position, item) in items.iter().enumerate() {
        match item {
            DisplayItem::Header => {
                flush(&mut row, &mut out);
                let width = span_size(position, columns) * (CELL_WIDTH + 1);
                let indent = width.saturating_sub(HEADER_TEXT.len()) / 2;
                out.push_str(&format!("{}{}\n\n", " ".repeat(indent), bold(HEADER_TEXT)));
            }
            DisplayItem::Night(night) => {
                row.push(night);
                if row.len() == columns {
                    flush(&mut row, &mut out);
                }
            }
        }
    }
    flush(&mut row, &mut out);

    out
}

/// Prints every submitted list to stdout and remembers what it showed.
pub struct GridRenderer {
    columns: usize,
    date_format: String,
    last: Mutex<Option<Rendered>>,
}

#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub text: String,
    pub items: usize,
    pub updates: Vec<ListUpdate>,
}

impl GridRenderer {
    pub fn new(columns: usize, date_format: impl Into<String>) -> Self {
        Self {
            columns,
            date_format: date_format.into(),
            last: Mutex::new(None),
        }
    }

    pub fn last_rendered(&self) -> Option<Rendered> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ListRenderer for GridRenderer {
    fn submit(&self, items: &[DisplayItem], updates: &[ListUpdate]) {
        let text = render_grid(items, self.columns, &self.date_format);
        print!("{text}");
        tracing::debug!(items = items.len(), updates = updates.len(), "grid rendered");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(Rendered {
            text,
            items: items.len(),
            updates: updates.to_vec(),
        });
    }
}

/// Detail card for a single night.
pub fn render_detail(night: &SleepNight, date_format: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", bold(&format!("Night #{}", night.night_id))));
    out.push_str(&format!(
        "  Start:    {}\n",
        format_millis(night.start_time_milli, date_format)
    ));
    if night.is_open() {
        out.push_str("  End:      -- (still sleeping)\n");
    } else {
        out.push_str(&format!(
            "  End:      {}\n",
            format_millis(night.end_time_milli, date_format)
        ));
        out.push_str(&format!(
            "  Duration: {}\n",
            millis2readable(night.duration_milli())
        ));
    }
    out.push_str(&format!(
        "  Quality:  {}{}{}\n",
        color_for_quality(night.sleep_quality),
        SleepQuality::label_for(night.sleep_quality),
        RESET
    ));
    out
}
