use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};
use std::path::Path;
use std::process::Command;

/// `$EDITOR`, then `$VISUAL`, then the platform default.
fn platform_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".into()
            } else {
                "nano".into()
            }
        })
}

fn edit_with(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    if *print_config {
        println!("📄 Configuration ({}):\n", Config::config_file().display());
        println!("{}", serde_yaml::to_string(cfg)?);
    }

    if *edit_config {
        let path = Config::config_file();
        let fallback = platform_editor();
        let requested = editor.clone().unwrap_or_else(|| fallback.clone());

        if edit_with(&requested, &path) {
            success(format!("Configuration edited with '{requested}'"));
        } else if requested != fallback && edit_with(&fallback, &path) {
            warning(format!(
                "Editor '{requested}' not available, used '{fallback}' instead"
            ));
            success(format!("Configuration edited with '{fallback}'"));
        } else {
            error(format!("Could not open {} in an editor", path.display()));
        }
    }

    Ok(())
}
