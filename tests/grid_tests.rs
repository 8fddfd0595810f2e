use sleeptracker::core::adapter::ListRenderer;
use sleeptracker::core::projection::{DisplayItem, ListUpdate, project};
use sleeptracker::errors::AppError;
use sleeptracker::models::{SleepNight, SleepQuality};
use sleeptracker::ui::grid::{GridRenderer, night_cell, render_detail, render_grid};
use sleeptracker::utils::formatting::{pad_right, truncate};
use sleeptracker::utils::{format_nights, millis2readable};

mod common;
use common::night;

const FMT: &str = "%Y-%m-%d";
const HOUR: i64 = 3_600_000;

fn numbered(id: i64, quality: i32) -> SleepNight {
    SleepNight {
        night_id: id,
        ..night(id * 86_400_000, id * 86_400_000 + 7 * HOUR + 30 * 60_000, quality)
    }
}

#[test]
fn test_millis2readable() {
    assert_eq!(millis2readable(0), "00h 00m 00s");
    assert_eq!(millis2readable(7 * HOUR + 30 * 60_000 + 5_000), "07h 30m 05s");
    assert_eq!(millis2readable(-10), "00h 00m 00s");
}

#[test]
fn test_quality_labels() {
    assert_eq!(SleepQuality::from_value(0).unwrap().label(), "Very bad");
    assert_eq!(SleepQuality::from_value(5).unwrap().label(), "Excellent");
    assert_eq!(SleepQuality::label_for(-1), "--");
    assert!(matches!(
        SleepQuality::from_value(6),
        Err(AppError::InvalidQuality(6))
    ));
}

#[test]
fn test_truncate_and_pad_use_terminal_width() {
    assert_eq!(truncate("abcdef", 4), "abc…");
    assert_eq!(truncate("abc", 4), "abc");
    assert_eq!(pad_right("ab", 4), "ab  ");
}

#[test]
fn test_format_nights_skips_end_of_open_night() {
    let open = SleepNight::new(HOUR);
    let text = format_nights(&[numbered(1, 4), open], FMT);

    assert!(text.starts_with("Here is your sleep data:\n"));
    assert_eq!(text.matches("Start: ").count(), 2);
    assert_eq!(text.matches("End: ").count(), 1);
    assert!(text.contains("Quality: Pretty good"));
    assert!(text.contains("Hours:Minutes:Seconds: 07h 30m 00s"));
}

#[test]
fn test_night_cell_lines() {
    let [title, _, length] = night_cell(&numbered(3, 1), FMT);
    assert_eq!(title, "#3 Poor");
    assert_eq!(length, "07h 30m 00s");

    let [title, _, length] = night_cell(&SleepNight { night_id: 4, ..SleepNight::new(0) }, FMT);
    assert_eq!(title, "#4 sleeping…");
    assert_eq!(length, "--");
}

#[test]
fn test_grid_wraps_rows_after_header() {
    let nights: Vec<SleepNight> = (1..=4).rev().map(|id| numbered(id, 2)).collect();
    let text = render_grid(&project(Some(&nights)), 3, FMT);

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("Sleep Results"));
    // first row holds three cells, the fourth night starts a new row
    let first_row = lines.iter().find(|l| l.contains("#4")).unwrap();
    assert!(first_row.contains("#3") && first_row.contains("#2"));
    assert!(!first_row.contains("#1"));
    assert!(text.contains("#1 So-so"));
}

#[test]
fn test_grid_of_empty_list_is_only_header() {
    let text = render_grid(&project(None), 3, FMT);
    assert!(text.contains("Sleep Results"));
    assert!(!text.contains('#'));
}

#[test]
fn test_grid_renderer_remembers_last_submission() {
    let renderer = GridRenderer::new(2, FMT);
    assert!(renderer.last_rendered().is_none());

    let items = vec![DisplayItem::Header, DisplayItem::Night(numbered(1, 5))];
    let updates = vec![ListUpdate::Inserted { position: 1 }];
    renderer.submit(&items, &updates);

    let last = renderer.last_rendered().unwrap();
    assert_eq!(last.items, 2);
    assert_eq!(last.updates, updates);
    assert!(last.text.contains("#1 Excellent"));
}

#[test]
fn test_detail_card() {
    let text = render_detail(&numbered(2, 3), FMT);
    assert!(text.contains("Night #2"));
    assert!(text.contains("Duration: 07h 30m 00s"));
    assert!(text.contains("OK"));

    let open = render_detail(&SleepNight { night_id: 5, ..SleepNight::new(0) }, FMT);
    assert!(open.contains("still sleeping"));
    assert!(!open.contains("Duration"));
}
