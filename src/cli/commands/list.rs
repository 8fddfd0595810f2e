use crate::cli::commands::TrackerContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { json, summary } = cmd {
        let ctx = TrackerContext::open(cfg).await?;
        let nights = ctx.tracker.nights().get();

        if *json {
            println!("{}", serde_json::to_string_pretty(&nights)?);
        } else if *summary {
            println!("{}", ctx.tracker.nights_string().get());
        } else {
            ctx.screen.render().await;
            if nights.is_empty() {
                info("No nights recorded yet.");
            }
            ctx.screen.print_buttons();
        }

        return ctx.finish().await;
    }

    Ok(())
}
