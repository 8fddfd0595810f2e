use crate::cli::commands::TrackerContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use std::io::{self, Write};

fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear { yes } = cmd {
        let ctx = TrackerContext::open(cfg).await?;

        if !ctx.tracker.clear_enabled().get() {
            info("Nothing to clear.");
            return ctx.finish().await;
        }

        if !*yes && !ask_confirmation("Delete every recorded night? This action is irreversible.")
        {
            info("Operation cancelled.");
            return ctx.finish().await;
        }

        ctx.tracker.on_clear();
        return ctx.finish().await;
    }

    Ok(())
}
