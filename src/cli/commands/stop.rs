use crate::cli::commands::TrackerContext;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::ui::screen::Destination;
use crate::utils::formatting::millis2readable;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = TrackerContext::open(cfg).await?;

    if !ctx.tracker.stop_enabled().get() {
        warning("No night is being tracked. Use `sleeptracker start` first.");
        return ctx.finish().await;
    }

    ctx.tracker.on_stop_tracking();
    ctx.tracker.settled().await;

    let session = ctx.tracker.session().get();
    if let Some(Destination::SleepQuality(night_id)) = ctx.navigator.take_destination()
        && let Some(night) = session.night()
    {
        success(format!(
            "Night #{} stopped after {}",
            night_id,
            millis2readable(night.duration_milli())
        ));
    }
    ctx.screen.print_buttons();

    ctx.finish().await
}
