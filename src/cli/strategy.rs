//! Handlers for `strategy show` and `strategy update`.

use std::path::Path;

use serde_json::json;

use super::control::report;
use super::{one_shot_console, output};
use crate::config::Config;
use crate::domain::{CommandKind, StrategyConfig};
use crate::error::Result;

pub async fn show(config: &Config) -> Result<()> {
    let console = one_shot_console(config);
    let strategy = console.commands().load_strategy().await?;

    if output::is_json() {
        output::json_output(json!({ "command": "strategy.show", "strategy": strategy }));
        return Ok(());
    }

    render(&strategy);
    Ok(())
}

pub async fn update(config: &Config, file: &Path) -> Result<()> {
    let strategy = read_strategy(file)?;
    let console = one_shot_console(config);
    let outcome = console.commands().update_strategy(strategy).await;
    report(&console, CommandKind::UpdateStrategy, outcome)
}

fn read_strategy(file: &Path) -> Result<StrategyConfig> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

fn render(strategy: &StrategyConfig) {
    output::section("Strategy");
    output::field("Name", output::highlight(&strategy.name));
    output::field("Enabled", strategy.enabled);
    for (key, value) in &strategy.parameters {
        output::field(key, value);
    }
    if !strategy.risk_limits.is_empty() {
        output::section("Risk limits");
        for (key, value) in &strategy.risk_limits {
            output::field(key, value);
        }
    }
}
