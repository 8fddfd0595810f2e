use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::quality::SleepQualityTracker;
use crate::db::SqliteSleepDao;
use crate::errors::AppResult;
use crate::models::SleepQuality;
use crate::ui::messages::success;
use std::sync::Arc;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Quality { id, value } = cmd {
        let quality = SleepQuality::from_value(*value)?;
        let dao = Arc::new(SqliteSleepDao::open(&cfg.database)?);

        let holder = SleepQualityTracker::new(dao, *id);
        holder.on_set_sleep_quality(quality);
        holder.settled().await;

        let error = holder.persistence_error().consume();
        let navigated = holder.navigate_to_sleep_tracker().consume().is_some();
        holder.dispose();

        if let Some(e) = error {
            return Err(e.into());
        }
        if navigated {
            success(format!("Night #{} rated: {}", id, quality.label()));
        }
    }

    Ok(())
}
