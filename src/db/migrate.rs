use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
pub fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the nights table exists.
fn nights_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='daily_sleep_quality_table'",
    )?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if the nights table already carries the `quality_rating` column.
fn nights_has_quality_column(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('daily_sleep_quality_table')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "quality_rating" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the nights table with the current schema.
fn create_nights_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS daily_sleep_quality_table (
            nightId          INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time_milli INTEGER NOT NULL,
            end_time_milli   INTEGER NOT NULL,
            quality_rating   INTEGER NOT NULL DEFAULT -1
        );
        "#,
    )?;
    Ok(())
}

/// Databases created before ratings existed only stored start/end.
fn migrate_add_quality_column(conn: &Connection) -> Result<()> {
    warning("Adding 'quality_rating' column to nights table...");

    conn.execute(
        "ALTER TABLE daily_sleep_quality_table
         ADD COLUMN quality_rating INTEGER NOT NULL DEFAULT -1;",
        [],
    )
    .map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Failed to add 'quality_rating' column: {}", e)),
        )
    })?;

    success("'quality_rating' column added.");
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn migrate_add_start_index(conn: &Connection) -> Result<()> {
    let version = "20260301_0001_nights_start_index";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_nights_start
         ON daily_sleep_quality_table(start_time_milli);",
    )?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Indexed nights by start time')",
        [version],
    )?;

    tracing::debug!(version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db() and every time the SQLite DAO opens a database.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !nights_table_exists(conn)? {
        create_nights_table(conn)?;
        success("Created nights table.");
    } else if !nights_has_quality_column(conn)? {
        migrate_add_quality_column(conn)?;
    }

    migrate_add_start_index(conn)?;

    Ok(())
}
