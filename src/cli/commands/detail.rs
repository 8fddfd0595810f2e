use crate::cli::commands::TrackerContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::detail::SleepDetail;
use crate::errors::{AppError, AppResult};
use crate::ui::grid::render_detail;
use crate::ui::screen::Destination;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Detail { id } = cmd {
        let ctx = TrackerContext::open(cfg).await?;

        ctx.tracker.on_sleep_night_clicked(*id);
        let Some(Destination::SleepDetail(night_id)) = ctx.navigator.take_destination() else {
            return ctx.finish().await;
        };

        let detail = SleepDetail::new(ctx.dao.clone(), night_id);
        detail.settled().await;

        let night = detail.night().get();
        let error = detail.persistence_error().consume();
        detail.on_close();
        detail.done_navigating();
        detail.dispose();
        ctx.finish().await?;

        if let Some(e) = error {
            return Err(e.into());
        }
        match night {
            Some(night) => print!("{}", render_detail(&night, &cfg.date_format)),
            None => return Err(AppError::NightNotFound(night_id)),
        }
    }

    Ok(())
}
