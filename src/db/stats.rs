use crate::db::pool::DbPool;
use crate::db::queries::count_nights;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::formatting::{format_millis, millis2readable};
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str, date_format: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL NIGHTS
    //
    let count = count_nights(&pool.conn)?;
    println!("{}• Total nights:{} {}{}{}", CYAN, RESET, GREEN, count, RESET);

    //
    // 3) RANGE
    //
    let (first, last): (Option<i64>, Option<i64>) = pool.conn.query_row(
        "SELECT MIN(start_time_milli), MAX(start_time_milli) FROM daily_sleep_quality_table",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let fmt = |v: Option<i64>| {
        v.map(|ms| format_millis(ms, date_format))
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    //
    // 4) AVERAGE DURATION OF CLOSED NIGHTS
    //
    let avg: Option<f64> = pool.conn.query_row(
        "SELECT AVG(end_time_milli - start_time_milli)
         FROM daily_sleep_quality_table
         WHERE end_time_milli <> start_time_milli",
        [],
        |row| row.get(0),
    )?;

    if let Some(avg) = avg {
        println!(
            "{}• Average duration:{} {}",
            CYAN,
            RESET,
            millis2readable(avg as i64)
        );
    }

    println!();
    Ok(())
}
