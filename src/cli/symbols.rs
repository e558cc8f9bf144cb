//! Handlers for `symbols show` and `symbols update`.

use serde_json::json;

use super::control::report;
use super::{one_shot_console, output};
use crate::config::Config;
use crate::domain::CommandKind;
use crate::error::Result;

pub async fn show(config: &Config) -> Result<()> {
    let console = one_shot_console(config);
    let symbols = console.commands().load_symbols().await?;

    if output::is_json() {
        output::json_output(json!({ "command": "symbols.show", "symbols": symbols }));
        return Ok(());
    }

    output::section("Symbols");
    if symbols.is_empty() {
        output::note("The bot reports no symbols");
    }
    for symbol in &symbols {
        output::field("Trading", output::highlight(symbol));
    }
    Ok(())
}

pub async fn update(config: &Config, symbols: &[String]) -> Result<()> {
    let console = one_shot_console(config);
    let outcome = console.commands().update_symbols(symbols).await;
    report(&console, CommandKind::UpdateSymbols, outcome)
}
