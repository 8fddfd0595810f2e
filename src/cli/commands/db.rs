use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn step(label: &str) {
    println!("{CYAN}▶ {label}…{RESET}");
}

fn done(label: &str) {
    println!("{GREEN}✔ {label}{RESET}\n");
}

fn integrity_check(pool: &mut DbPool) -> AppResult<()> {
    step("Running integrity check");
    let result: String =
        pool.with_conn(|conn| conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0)))?;

    if result == "ok" {
        done("Integrity check passed.");
    } else {
        println!("{RED}✘ Integrity check failed:{RESET} {result}\n");
    }
    Ok(())
}

/// Handle the `db` subcommand. Actions run in a fixed order:
/// migrate, info, check, vacuum.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        step("Running migrations");
        run_pending_migrations(&pool.conn)?;
        done("Migration completed.");
    }

    if *info {
        stats::print_db_info(&mut pool, &cfg.database, &cfg.date_format)?;
    }

    if *check {
        integrity_check(&mut pool)?;
    }

    if *vacuum {
        step("Running VACUUM");
        pool.with_conn(|conn| conn.execute_batch("VACUUM;"))?;
        done("Vacuum completed.");
    }

    Ok(())
}
