use crate::errors::AppResult;
use crate::models::SleepNight;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<SleepNight> {
    Ok(SleepNight {
        night_id: row.get("nightId")?,
        start_time_milli: row.get("start_time_milli")?,
        end_time_milli: row.get("end_time_milli")?,
        sleep_quality: row.get("quality_rating")?,
    })
}

/// Insert a night and return the id assigned by SQLite.
pub fn insert_night(conn: &Connection, night: &SleepNight) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO daily_sleep_quality_table (start_time_milli, end_time_milli, quality_rating)
         VALUES (?1, ?2, ?3)",
        params![
            night.start_time_milli,
            night.end_time_milli,
            night.sleep_quality
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a night (all fields except id). Returns the number of rows touched.
pub fn update_night(conn: &Connection, night: &SleepNight) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE daily_sleep_quality_table
         SET start_time_milli = ?1, end_time_milli = ?2, quality_rating = ?3
         WHERE nightId = ?4",
        params![
            night.start_time_milli,
            night.end_time_milli,
            night.sleep_quality,
            night.night_id
        ],
    )?;
    Ok(n)
}

pub fn get_night(conn: &Connection, night_id: i64) -> AppResult<Option<SleepNight>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM daily_sleep_quality_table WHERE nightId = ?1")?;
    let night = stmt.query_row([night_id], map_row).optional()?;
    Ok(night)
}

/// The most recently inserted night, open or not.
pub fn get_tonight(conn: &Connection) -> AppResult<Option<SleepNight>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM daily_sleep_quality_table ORDER BY nightId DESC LIMIT 1",
    )?;
    let night = stmt.query_row([], map_row).optional()?;
    Ok(night)
}

/// All nights, newest first.
pub fn get_all_nights(conn: &Connection) -> AppResult<Vec<SleepNight>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM daily_sleep_quality_table ORDER BY nightId DESC")?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete every night. Returns how many rows were removed.
pub fn clear_nights(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM daily_sleep_quality_table", [])?;
    Ok(n)
}

pub fn count_nights(conn: &Connection) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM daily_sleep_quality_table",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
