use crate::cli::commands::TrackerContext;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::format_millis;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = TrackerContext::open(cfg).await?;

    if let Some(night) = ctx.tracker.tonight() {
        warning(format!(
            "Night #{} is still being tracked (since {}). Stop it first.",
            night.night_id,
            format_millis(night.start_time_milli, &cfg.date_format)
        ));
        return ctx.finish().await;
    }

    ctx.tracker.on_start_tracking();
    ctx.tracker.settled().await;

    if let Some(night) = ctx.tracker.tonight() {
        success(format!(
            "Sleep tracking started: night #{} at {}",
            night.night_id,
            format_millis(night.start_time_milli, &cfg.date_format)
        ));
    }
    ctx.screen.print_buttons();

    ctx.finish().await
}
