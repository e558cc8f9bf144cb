//! Handlers for `login` and `logout`.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use serde_json::json;

use super::{one_shot_console, output};
use crate::config::Config;
use crate::error::Result;

pub async fn login(config: &Config, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Bot password")
            .allow_empty_password(true)
            .interact()?,
    };

    let console = one_shot_console(config);
    let pb = output::spinner("Logging in...");
    let session = match console.login(&password).await {
        Ok(session) => session,
        Err(e) => {
            output::spinner_fail(&pb, "Login failed");
            return Err(e.into());
        }
    };
    output::spinner_success(&pb, "Logged in");

    if output::is_json() {
        output::json_output(json!({
            "command": "login",
            "status": "ok",
            "started_at": session.started_at(),
            "token_path": config.session.token_path(),
        }));
        return Ok(());
    }

    output::field("Bot", &config.api.base_url);
    output::field("Token", config.session.token_path().display());
    if let Some(bot) = console.store().bot_state() {
        output::field("Running", bot.running);
        output::field("Mode", bot.mode);
    }
    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let console = one_shot_console(config);
    if !console.session().restore() {
        output::note("Not logged in");
        return Ok(());
    }

    let acknowledged = console.logout().await;

    if output::is_json() {
        output::json_output(json!({
            "command": "logout",
            "acknowledged": acknowledged,
        }));
        return Ok(());
    }
    output::success("Session cleared");
    if !acknowledged {
        output::warning("The bot did not acknowledge the logout");
    }
    Ok(())
}
