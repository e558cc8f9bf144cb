//! Handler for `check`: validate configuration and reach the bot.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::adapter::http::HttpBotApi;
use crate::adapter::token_file::FileTokenStore;
use crate::config::Config;
use crate::error::Result;
use crate::port::{BotApi, TokenStore};

pub async fn execute(config_path: &Path) -> Result<()> {
    let from_file = config_path.exists();
    let config = Config::load_or_default(config_path)?;
    config.init_logging();

    let api = HttpBotApi::from_config(&config.api);
    let tokens = FileTokenStore::new(config.session.token_path());
    let has_session = matches!(tokens.load(), Ok(Some(_)));

    if output::is_json() {
        let reachable = api.health().await;
        output::json_output(json!({
            "command": "check",
            "config": config_path.display().to_string(),
            "config_found": from_file,
            "base_url": api.base_url(),
            "reachable": reachable.is_ok(),
            "error": reachable.as_ref().err().map(ToString::to_string),
            "session": has_session,
        }));
        return reachable;
    }

    output::section("Configuration");
    if from_file {
        output::success(&format!("{} is valid", config_path.display()));
    } else {
        output::note(&format!(
            "{} not found, using defaults",
            config_path.display()
        ));
    }
    output::field("Bot", api.base_url());
    output::field(
        "Polling",
        format!(
            "{}ms fast, {}ms slow",
            config.polling.fast_interval_ms, config.polling.slow_interval_ms
        ),
    );
    output::field("Token file", tokens.path().display());
    output::field("Session", if has_session { "present" } else { "none" });

    output::section("Connection");
    let pb = output::spinner("Checking bot health...");
    match api.health().await {
        Ok(()) => output::spinner_success(&pb, "Bot reachable"),
        Err(e) => {
            output::spinner_fail(&pb, "Bot unreachable");
            return Err(e);
        }
    }

    if !has_session {
        output::hint("run `helmsman login` to start a session");
    }
    Ok(())
}
